mod bounds;
mod range_limit;
mod ray;
mod segment;

pub use bounds::{BoundarySide, SceneBounds};
pub use range_limit::{HalfSplit, RangeLimit, RangeLimitHalf, RangeLimitHit};
pub use ray::Ray;
pub use segment::Segment;
