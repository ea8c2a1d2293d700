use derive_more::From;
use geometry::Axis;

/// Index of a box in [`BspTree::elements`](crate::BspTree::elements).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From)]
pub struct ElementId(pub u32);

impl ElementId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Orientation of the dividing line; a `Vertical` line splits along the x axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SplitType {
    Vertical,
    Horizontal,
}

impl SplitType {
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Vertical => Axis::X,
            Self::Horizontal => Axis::Y,
        }
    }

    #[must_use]
    pub const fn from_axis(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Vertical,
            Axis::Y => Self::Horizontal,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertical => "Vertical",
            Self::Horizontal => "Horizontal",
        }
    }
}

/// Describes an internal node: its axis and the tight interval `[min, max]`
/// all of its boxes occupy along that axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Split {
    pub split_type: SplitType,
    pub min: f32,
    pub max: f32,
}

impl Split {
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.split_type.axis()
    }

    /// The dividing line. Left holds every box starting at or below it, right
    /// every box ending at or above it.
    #[must_use]
    pub fn coordinate(&self) -> f32 {
        // halves first so huge bounds do not overflow
        self.min * 0.5 + self.max * 0.5
    }

    /// `true` when `[lo, hi]` lies entirely outside the node's interval.
    #[must_use]
    pub fn excludes(&self, lo: f32, hi: f32) -> bool {
        hi < self.min || lo > self.max
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Split(Split, Box<Node>, Box<Node>),
    Leaf(Vec<ElementId>),
}

impl Node {
    pub const EMPTY_LEAF: Self = Self::Leaf(Vec::new());

    #[must_use]
    pub fn children(&self) -> Option<(&Self, &Self)> {
        match self {
            Self::Split(_, left, right) => Some((left, right)),
            Self::Leaf(_) => None,
        }
    }
}

/// Depth-first iterator over leaf contents, see [`BspTree::leaves`](crate::BspTree::leaves).
#[derive(Debug)]
pub struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a [ElementId];

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop()? {
                Node::Split(_, left, right) => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
                Node::Leaf(ids) => return Some(ids),
            }
        }
    }
}
