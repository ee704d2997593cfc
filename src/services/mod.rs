pub mod converter;
pub mod evaluator;
pub mod live;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod regression;
pub mod splitter;

pub use evaluator::evaluate;
pub use live::LivePredictor;
pub use model::PriceModel;
pub use normalizer::{Bounds, NormalizationBounds};
pub use pipeline::{train_on_chart, TrainedModel, TrainingPipeline};
pub use regression::{fit_line, LinearFit};
