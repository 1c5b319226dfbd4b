//! Pattern scores for Gomoku evaluation
//!
//! These constants define the scoring weights for line shapes found on the
//! board. The ordering matters more than the exact values: each shape must
//! outweigh any realistic sum of the shapes below it.

/// Pattern scores for evaluation
pub struct PatternScore;

impl PatternScore {
    /// Five in a row - immediate win
    pub const FIVE: i32 = 1_000_000;

    /// Open four: _OOOO_ (two ways to make five)
    pub const OPEN_FOUR: i32 = 100_000;
    /// Closed or split four: XOOOO_, OO_OO (one way to make five)
    pub const CLOSED_FOUR: i32 = 50_000;

    /// Open three: _OOO_ or _OO_O_ (becomes an open four if not blocked)
    pub const OPEN_THREE: i32 = 10_000;
    /// Closed three: XOOO_ (one side blocked)
    pub const CLOSED_THREE: i32 = 1_500;

    /// Open two: _OO_ or _O_O_
    pub const OPEN_TWO: i32 = 1_000;
    /// Closed two: XOO_
    pub const CLOSED_TWO: i32 = 200;
}

/// Shape of one line segment, as read from its first stone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Shape {
    None,
    ClosedTwo,
    OpenTwo,
    ClosedThree,
    OpenThree,
    Four,
    OpenFour,
    Five,
}

impl Shape {
    /// Classify a segment of `count` stones with `open_ends` empty ends.
    ///
    /// `has_gap` marks a segment with one empty cell inside it; a gapped
    /// segment is never a five, since the gap still has to be filled.
    pub fn classify(count: usize, open_ends: u8, has_gap: bool) -> Shape {
        if has_gap {
            return match (count, open_ends) {
                (4.., _) => Shape::Four,
                (3, 2) => Shape::OpenThree,
                (3, 1) => Shape::ClosedThree,
                (2, 2) => Shape::OpenTwo,
                (2, 1) => Shape::ClosedTwo,
                _ => Shape::None,
            };
        }
        match (count, open_ends) {
            (5.., _) => Shape::Five,
            (4, 2) => Shape::OpenFour,
            (4, 1) => Shape::Four,
            (3, 2) => Shape::OpenThree,
            (3, 1) => Shape::ClosedThree,
            (2, 2) => Shape::OpenTwo,
            (2, 1) => Shape::ClosedTwo,
            _ => Shape::None,
        }
    }

    pub fn score(self) -> i32 {
        match self {
            Shape::None => 0,
            Shape::ClosedTwo => PatternScore::CLOSED_TWO,
            Shape::OpenTwo => PatternScore::OPEN_TWO,
            Shape::ClosedThree => PatternScore::CLOSED_THREE,
            Shape::OpenThree => PatternScore::OPEN_THREE,
            Shape::Four => PatternScore::CLOSED_FOUR,
            Shape::OpenFour => PatternScore::OPEN_FOUR,
            Shape::Five => PatternScore::FIVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_score_hierarchy() {
        assert!(PatternScore::FIVE > PatternScore::OPEN_FOUR);
        assert!(PatternScore::OPEN_FOUR > PatternScore::CLOSED_FOUR);
        assert!(PatternScore::CLOSED_FOUR > PatternScore::OPEN_THREE);
        assert!(PatternScore::OPEN_THREE > PatternScore::CLOSED_THREE);
        assert!(PatternScore::CLOSED_THREE > PatternScore::OPEN_TWO);
        assert!(PatternScore::OPEN_TWO > PatternScore::CLOSED_TWO);
    }

    #[test]
    fn test_shape_order_matches_scores() {
        let shapes = [
            Shape::None,
            Shape::ClosedTwo,
            Shape::OpenTwo,
            Shape::ClosedThree,
            Shape::OpenThree,
            Shape::Four,
            Shape::OpenFour,
            Shape::Five,
        ];
        for pair in shapes.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].score() < pair[1].score());
        }
    }

    #[test]
    fn test_classify_solid_runs() {
        assert_eq!(Shape::classify(5, 0, false), Shape::Five);
        assert_eq!(Shape::classify(6, 1, false), Shape::Five);
        assert_eq!(Shape::classify(4, 2, false), Shape::OpenFour);
        assert_eq!(Shape::classify(4, 1, false), Shape::Four);
        assert_eq!(Shape::classify(4, 0, false), Shape::None, "dead four");
        assert_eq!(Shape::classify(3, 2, false), Shape::OpenThree);
        assert_eq!(Shape::classify(1, 2, false), Shape::None);
    }

    #[test]
    fn test_classify_gapped_runs() {
        // OO_OO and O_OOO: one fill makes five
        assert_eq!(Shape::classify(4, 0, true), Shape::Four);
        assert_eq!(Shape::classify(4, 2, true), Shape::Four);
        assert_eq!(Shape::classify(3, 2, true), Shape::OpenThree);
        assert_eq!(Shape::classify(3, 1, true), Shape::ClosedThree);
        assert_eq!(Shape::classify(2, 2, true), Shape::OpenTwo);
    }
}
