use std::{fs, io::Write, path::Path};

use anyhow::{Context, bail, ensure};
use bsp_region::{BspTree, BuildConfig, parse_tree};
use geometry::Aabb;
use glam::Vec2;
use tracing::{info, warn};

/// What a `query` looks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Point(Vec2),
    Region(Aabb),
}

impl Probe {
    pub fn point(coords: &[f32]) -> anyhow::Result<Self> {
        let &[x, y] = coords else {
            bail!("--point takes 2 coordinates, got {}", coords.len());
        };
        ensure!(x.is_finite() && y.is_finite(), "point ({x}, {y}) is not finite");

        Ok(Self::Point(Vec2::new(x, y)))
    }

    pub fn region(coords: &[f32]) -> anyhow::Result<Self> {
        let &[min_x, min_y, max_x, max_y] = coords else {
            bail!("--region takes 4 coordinates, got {}", coords.len());
        };

        let region = Aabb::new([min_x, min_y], [max_x, max_y]).context("invalid --region")?;
        Ok(Self::Region(region))
    }
}

fn load_dump(path: &Path) -> anyhow::Result<BspTree> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read dump {}", path.display()))?;

    parse_tree(&text).with_context(|| format!("failed to parse dump {}", path.display()))
}

pub fn build(
    input: &Path,
    config: &Path,
    output: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let config = BuildConfig::load(config)?;

    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read boxes from {}", input.display()))?;
    let elements: Vec<Aabb> = serde_json::from_str(&text)
        .with_context(|| format!("failed to decode boxes from {}", input.display()))?;

    let tree = BspTree::build(elements, &config)?;

    let stats = tree.stats();
    info!(%stats, "built tree");

    if let Some(report) = tree.report().filter(|report| !report.capacity_guaranteed()) {
        warn!(
            depth_cutoffs = report.depth_cutoffs,
            inseparable_leaves = report.inseparable_leaves,
            leaf_capacity = config.leaf_capacity,
            "some leaves hold more boxes than leaf_capacity"
        );
    }

    let dump = format!("{}\n", tree.dump());

    match output {
        Some(path) => {
            fs::write(path, dump).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote dump");
        }
        None => out.write_all(dump.as_bytes())?,
    }

    Ok(())
}

pub fn inspect(dump: &Path, out: &mut impl Write) -> anyhow::Result<()> {
    let tree = load_dump(dump)?;
    let stats = tree.stats();

    info!(
        depth = stats.depth,
        leaves = stats.leaves,
        largest_leaf = stats.largest_leaf,
        "inspected tree"
    );
    writeln!(out, "{stats}")?;

    Ok(())
}

pub fn query(dump: &Path, probe: &Probe, out: &mut impl Write) -> anyhow::Result<()> {
    let tree = load_dump(dump)?;

    let ids = match probe {
        Probe::Point(point) => tree.query_point_ids(*point),
        Probe::Region(region) => tree.query_region_ids(region),
    };

    for &id in &ids {
        if let Some(aabb) = tree.get(id) {
            writeln!(out, "{} {aabb:?}", id.0)?;
        }
    }

    info!(matches = ids.len(), ?probe, "query finished");
    Ok(())
}

#[cfg(feature = "plot")]
pub fn plot(dump: &Path, output: &Path) -> anyhow::Result<()> {
    let tree = load_dump(dump)?;

    tree.plot(output)
        .map_err(|err| anyhow::anyhow!("failed to plot {}: {err}", output.display()))?;

    info!(path = %output.display(), "wrote plot");
    Ok(())
}
