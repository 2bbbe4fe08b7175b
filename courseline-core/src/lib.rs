//! Courseline Core - Business logic for course management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (User, Course, Enrollment, etc.)
//! - **ports**: Trait definitions for external dependencies (StateStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (JSON file store, memory store)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use adapters::{JsonFileStore, MemoryStore};
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    AuthState, Course, CourseProgress, Enrollment, Lesson, Section, SessionUser, User,
    UserCategory,
};
pub use ports::{StateStore, StateStoreExt};

/// Main context for Courseline operations
///
/// This is the primary entry point for all business logic. It holds the
/// stores, configuration, and all services. The persistent store keeps the
/// durable slices; the session store keeps flags scoped to the current
/// sign-in session (sign-out and the flag consumers clear them).
pub struct CourselineContext {
    pub config: Config,
    pub store: Arc<dyn StateStore>,
    pub session: Arc<dyn StateStore>,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub enrollment_service: EnrollmentService,
    pub dashboard_service: DashboardService,
    pub chatbot_service: ChatbotService,
    pub demo_service: DemoService,
}

impl CourselineContext {
    /// Create a new Courseline context rooted at a data directory
    pub fn new(courseline_dir: &Path) -> Result<Self> {
        let config = Config::load(courseline_dir)?;

        // Demo mode keeps its slices in a subdirectory
        let data_dir = if config.demo_mode {
            courseline_dir.join("demo")
        } else {
            courseline_dir.to_path_buf()
        };

        let store: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(&data_dir)?);
        let session: Arc<dyn StateStore> = Arc::new(JsonFileStore::new(&data_dir.join("session"))?);
        let latency = Duration::from_millis(config.latency_ms);

        let auth_service = AuthService::new(Arc::clone(&store), Arc::clone(&session), latency);
        let catalog_service = CatalogService::new(Arc::clone(&store), latency);
        let enrollment_service = EnrollmentService::new(Arc::clone(&store), latency);
        let dashboard_service = DashboardService::new(Arc::clone(&store));
        let chatbot_service =
            ChatbotService::new(Arc::clone(&store), Arc::clone(&session), latency);
        let demo_service = DemoService::new(courseline_dir);

        Ok(Self {
            config,
            store,
            session,
            auth_service,
            catalog_service,
            enrollment_service,
            dashboard_service,
            chatbot_service,
            demo_service,
        })
    }

    /// Create a context over in-memory stores with zero latency (tests)
    pub fn in_memory() -> Self {
        let store: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let session: Arc<dyn StateStore> = Arc::new(MemoryStore::new());
        let latency = Duration::ZERO;

        Self {
            config: Config::default(),
            auth_service: AuthService::new(Arc::clone(&store), Arc::clone(&session), latency),
            catalog_service: CatalogService::new(Arc::clone(&store), latency),
            enrollment_service: EnrollmentService::new(Arc::clone(&store), latency),
            dashboard_service: DashboardService::new(Arc::clone(&store)),
            chatbot_service: ChatbotService::new(Arc::clone(&store), Arc::clone(&session), latency),
            demo_service: DemoService::new(Path::new(".")),
            store,
            session,
        }
    }
}
