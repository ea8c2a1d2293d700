use std::{error::Error, path::Path};

use geometry::{Aabb, Axis};
use glam::Vec2;
use plotters::{
    chart::{ChartBuilder, ChartContext},
    coord::types::RangedCoordf32,
    drawing::IntoDrawingArea,
    element::{PathElement, Rectangle},
    prelude::Cartesian2d,
    style::{BLACK, Color, RGBColor, ShapeStyle, WHITE},
};
use plotters_bitmap::BitMapBackend;
use tracing::debug;

use crate::{BspTree, Node};

type Chart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf32, RangedCoordf32>>;

const SIZE: (u32, u32) = (1000, 1000);

impl BspTree {
    /// Renders split lines and leaf contents to a png at `path`.
    ///
    /// Leaf colors are seeded, so the same tree always produces the same image.
    pub fn plot(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let root_area = BitMapBackend::new(path.as_ref(), SIZE).into_drawing_area();
        root_area.fill(&BLACK)?;

        let Some(bounds) = Aabb::containing(self.elements()) else {
            debug!("nothing to plot");
            root_area.present()?;
            return Ok(());
        };

        debug!(%bounds, "plotting bsp tree");

        // a degenerate axis still needs a drawable range
        let pad = Vec2::splat(1.0);
        let mins = bounds.mins() - pad;
        let maxs = bounds.maxs() + pad;

        let mut chart =
            ChartBuilder::on(&root_area).build_cartesian_2d(mins.x..maxs.x, mins.y..maxs.y)?;

        let mut rng = fastrand::Rng::with_seed(0x00b5_b5b5);
        self.draw_node(&mut chart, &mut rng, self.root(), (mins, maxs))?;

        root_area.present()?;
        Ok(())
    }

    fn draw_node(
        &self,
        chart: &mut Chart<'_, '_>,
        rng: &mut fastrand::Rng,
        node: &Node,
        (mins, maxs): (Vec2, Vec2),
    ) -> Result<(), Box<dyn Error>> {
        match node {
            Node::Split(split, left, right) => {
                let at = split.coordinate();
                let axis = split.axis();

                let line = match axis {
                    Axis::X => [(at, mins.y), (at, maxs.y)],
                    Axis::Y => [(mins.x, at), (maxs.x, at)],
                };
                let style = WHITE.mix(0.4).stroke_width(1);
                chart.draw_series(std::iter::once(PathElement::new(line, style)))?;

                let mut left_maxs = maxs;
                left_maxs[axis.index()] = at;
                let mut right_mins = mins;
                right_mins[axis.index()] = at;

                self.draw_node(chart, rng, left, (mins, left_maxs))?;
                self.draw_node(chart, rng, right, (right_mins, maxs))?;
            }
            Node::Leaf(ids) => {
                let color = RGBColor(rng.u8(..), rng.u8(..), rng.u8(..));
                let style = color.mix(0.35).filled().stroke_width(1);

                for aabb in ids.iter().filter_map(|&id| self.get(id)) {
                    draw_aabb(chart, style, aabb)?;
                }
            }
        }

        Ok(())
    }
}

fn draw_aabb(
    chart: &mut Chart<'_, '_>,
    style: ShapeStyle,
    aabb: &Aabb,
) -> Result<(), Box<dyn Error>> {
    let (mins, maxs) = (aabb.mins(), aabb.maxs());
    let rect = [(mins.x, mins.y), (maxs.x, maxs.y)];
    chart.draw_series(std::iter::once(Rectangle::new(rect, style)))?;
    Ok(())
}
