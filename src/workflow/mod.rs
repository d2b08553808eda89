pub mod batch_ctx;
pub mod batch_flow;
pub mod generation_state;
pub mod session;

pub use batch_ctx::BatchCtx;
pub use batch_flow::BatchFlow;
pub use generation_state::GenerationState;
pub use session::{ApiCredential, QuizSession};
