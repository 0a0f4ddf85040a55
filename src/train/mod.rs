pub mod trainer;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use trainer::{train_epoch, TrainingSample};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use loop_fn::{count_mismatches, rounds_to_match, train_until_converged, TrainOutcome};
