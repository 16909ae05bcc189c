mod indicator;
mod instrument;
mod metrics;
mod price_bar;
mod quote;

pub use indicator::{EconomicIndicator, IndicatorKind};
pub use instrument::{Instrument, InstrumentClass};
pub use metrics::{ComparisonPoint, ComparisonSeries, CorrelationReport, InstrumentMetrics};
pub use price_bar::PriceBar;
pub use quote::{Quote, QuoteKind};
