//! Services module - business logic layer
//!
//! Services own a [`Store`](crate::store::Store) handle and, where they
//! generate content, an injected LLM or RAG client.

pub mod auth_service;
pub mod chat_service;
pub mod insight_service;
pub mod message_service;
pub mod multistep_report_service;
pub mod project_service;
pub mod prompts;
pub mod rag_service;
pub mod report_management;
pub mod report_service;
pub mod signup_service;
pub mod thread_service;
pub mod transcript;

pub use auth_service::{AuthService, LoginRequest, LoginResponse, ProfileUpdate, RegisterRequest};
pub use chat_service::{ChatExchange, ChatService};
pub use insight_service::{AttachInsightRequest, GenerateInsightRequest, InsightService};
pub use message_service::{AddMessageRequest, MessageService};
pub use multistep_report_service::{MultistepReportRequest, MultistepReportService};
pub use project_service::ProjectService;
pub use rag_service::{RagQueryRequest, RagQueryService};
pub use report_management::{DeleteReportRequest, RenameReportRequest, ReportManagementService};
pub use report_service::{generated_message, GenerateReportRequest, ReportService};
pub use signup_service::SignupService;
pub use thread_service::ThreadService;
pub use transcript::build_transcript;
