pub mod core;
pub mod plugins;
pub mod shared;
pub mod storage;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::logging::{init_logging, LoggingError, LoggingGuards};
use crate::core::platform::Platform;
use crate::core::settings::AppSettings;
use crate::plugins::chat::{ChatBackend, ChatError, ChatSession, HttpChatBackend};
use crate::plugins::dashboard::Overview;
use crate::plugins::music::demo::DemoPlayer;
use crate::plugins::music::MusicScreen;
use crate::plugins::tasks::TaskScreen;
use crate::plugins::todo::TodoScreen;
use crate::shared::paths::get_log_dir;

/// Install file logging under the default log directory.
/// Call once, first, and keep the guards alive until shutdown.
pub fn start_logging() -> Result<LoggingGuards, LoggingError> {
    init_logging(&get_log_dir())
}

/// Every screen of the app, opened against one set of host collaborators.
pub struct Nexs {
    pub settings: AppSettings,
    pub tasks: TaskScreen,
    pub todos: TodoScreen,
    pub music: MusicScreen,
    pub demo: Mutex<DemoPlayer>,
    pub chat: ChatSession,
    platform: Platform,
}

impl Nexs {
    /// Open all screens, talking to the chat endpoint from `settings` over HTTP.
    pub async fn init(platform: Platform, settings: AppSettings) -> Result<Self, ChatError> {
        let backend = HttpChatBackend::new(&settings)?;
        tracing::info!(target: "system", endpoint = %backend.endpoint(), "Chat backend configured");
        Ok(Self::with_chat_backend(platform, settings, Arc::new(backend)).await)
    }

    pub async fn with_chat_backend(
        platform: Platform,
        settings: AppSettings,
        chat_backend: Arc<dyn ChatBackend>,
    ) -> Self {
        let (tasks, todos, music) = tokio::join!(
            TaskScreen::open(&platform, &settings),
            TodoScreen::open(&platform),
            MusicScreen::open(&platform, &settings),
        );
        let demo = DemoPlayer::open(&platform, &settings);

        tracing::info!(target: "system", "All screens ready");

        Self {
            tasks,
            todos,
            music,
            demo: Mutex::new(demo),
            chat: ChatSession::new(chat_backend),
            settings,
            platform,
        }
    }

    /// Home screen summary as of now.
    pub fn overview(&self) -> Overview {
        Overview::build(
            &self.tasks.tasks(),
            &self.todos.todos(),
            &self.music.playlists(),
            self.platform.clock.now(),
            self.settings.upcoming_limit,
        )
    }

    /// Stop playback and flush every pending write.
    pub async fn shutdown(self) {
        tokio::join!(
            self.tasks.close(),
            self.todos.close(),
            self.music.teardown(),
            self.demo.into_inner().teardown(),
        );
        tracing::info!(target: "system", "Shutdown complete");
    }
}
