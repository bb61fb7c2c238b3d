pub mod color;
pub mod format;
pub mod waterfall;

pub use waterfall::{
    compute_bars, BridgeBar, BridgeStep, ColorClass, InvalidInput, StepRole, WaterfallLayout,
};
