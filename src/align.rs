#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Main-axis distribution of leftover space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Cross-axis placement of each child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

impl Justify {
    /// Leading offset and extra per-gap spacing for `count` items sharing
    /// `free` pixels of leftover space.
    pub(crate) fn spacing(self, free: f32, count: usize) -> (f32, f32) {
        if free <= 0.0 || count == 0 {
            return (0.0, 0.0);
        }
        match self {
            Justify::Start => (0.0, 0.0),
            Justify::Center => (free / 2.0, 0.0),
            Justify::End => (free, 0.0),
            Justify::SpaceBetween => {
                if count > 1 {
                    (0.0, free / (count - 1) as f32)
                } else {
                    (0.0, 0.0)
                }
            }
            Justify::SpaceAround => {
                let gap = free / count as f32;
                (gap / 2.0, gap)
            }
            Justify::SpaceEvenly => {
                let gap = free / (count + 1) as f32;
                (gap, gap)
            }
        }
    }
}

impl Align {
    /// Offset of a child of size `child` inside `available` cross space.
    pub(crate) fn offset(self, available: f32, child: f32) -> f32 {
        match self {
            Align::Start | Align::Stretch => 0.0,
            Align::Center => (available - child) / 2.0,
            Align::End => available - child,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_between_single_item_is_flush() {
        assert_eq!(Justify::SpaceBetween.spacing(100.0, 1), (0.0, 0.0));
        assert_eq!(Justify::SpaceBetween.spacing(100.0, 3), (0.0, 50.0));
    }

    #[test]
    fn space_around_and_evenly() {
        assert_eq!(Justify::SpaceAround.spacing(90.0, 3), (15.0, 30.0));
        assert_eq!(Justify::SpaceEvenly.spacing(100.0, 3), (25.0, 25.0));
    }

    #[test]
    fn no_free_space_means_no_offsets() {
        assert_eq!(Justify::Center.spacing(-20.0, 2), (0.0, 0.0));
        assert_eq!(Justify::End.spacing(0.0, 2), (0.0, 0.0));
    }

    #[test]
    fn align_offsets() {
        assert_eq!(Align::Center.offset(100.0, 40.0), 30.0);
        assert_eq!(Align::End.offset(100.0, 40.0), 60.0);
        assert_eq!(Align::Stretch.offset(100.0, 40.0), 0.0);
    }
}
