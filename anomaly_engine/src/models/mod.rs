pub mod bar;
pub mod bar_series;
pub mod event;

pub use bar::Bar;
pub use bar_series::BarSeries;
pub use event::{AlignmentResult, AnomalyEvent, EventDistance, OutlierLabel};
