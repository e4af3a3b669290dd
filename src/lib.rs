#![forbid(unsafe_code)]
#![doc = r#"
Codemorph

Convert source code between programming languages by delegating the
translation to an OpenAI-compatible chat-completion endpoint.

Crate highlights
- Library: pure prompt construction via `build_prompt` and the
  `CodeConverter` orchestrator over a pluggable `CompletionBackend`.
- HTTP server (in `server`): `POST /api/convert` plus a `/status` probe.
- No verification of the returned text: translation correctness is the
  upstream model's responsibility.

Modules
- `models`: Request/response value types and their wire shapes.
- `completion`: Outbound chat-completion client and its error taxonomy.
- `converter`: Prompt construction, call execution, response normalization.
- `server`: Actix handlers and route configuration.
- `util`: Shared helpers (tracing/dotenv bootstrap, HTTP client, CORS, state).
"#]

pub mod completion;
pub mod converter;
pub mod models;
pub mod server;
pub mod util;

pub use crate::completion::{
    ChatCompletionClient, CompletionBackend, CompletionConfig, CompletionError, GenerationOptions,
};
pub use crate::converter::{build_prompt, CodeConverter, MAX_OUTPUT_TOKENS, TEMPERATURE};
pub use crate::models::{Conversion, ConversionBody, ConversionRequest};
