//! Talking to the Gemini API: transport, retrying executor, response interpreter.

pub mod executor;
pub mod gemini;
pub mod interpreter;
pub mod transport;

pub use executor::{
    AttemptObserver, AttemptOutcome, Delay, NoDelay, RequestExecutor, TokioDelay,
    TracingObserver, TransientCause,
};
pub use gemini::GeminiClient;
pub use interpreter::{Interpretation, interpret};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
