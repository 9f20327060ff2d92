//! Fake platform collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nexs_lib::core::audio::{AudioEngine, PlaybackStatus, Sound};
use nexs_lib::core::notifications::{NotificationScheduler, Reminder, ReminderId};
use nexs_lib::core::picker::{DocumentPicker, PickedFile};
use nexs_lib::core::platform::{ConfirmRequest, Platform, Prompt};
use nexs_lib::shared::errors::PlatformError;
use nexs_lib::shared::time::FixedClock;
use nexs_lib::storage::{KeyValueStorage, MemoryStorage};

/// 2025-06-01 08:00, the "now" every test starts from.
pub fn start_of_day() -> NaiveDateTime {
    date(1).and_hms_opt(8, 0, 0).unwrap()
}

pub fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

// =============================================================================
// Notifications
// =============================================================================

#[derive(Default)]
pub struct RecordingScheduler {
    pub scheduled: Mutex<Vec<(ReminderId, Reminder)>>,
    pub cancelled: Mutex<Vec<ReminderId>>,
    pub fail_scheduling: AtomicBool,
    next_id: AtomicUsize,
}

impl RecordingScheduler {
    pub fn scheduled(&self) -> Vec<(ReminderId, Reminder)> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<ReminderId> {
        self.cancelled.lock().unwrap().clone()
    }

    /// Scheduled and never cancelled.
    pub fn pending(&self) -> Vec<ReminderId> {
        let cancelled = self.cancelled();
        self.scheduled()
            .into_iter()
            .map(|(id, _)| id)
            .filter(|id| !cancelled.contains(id))
            .collect()
    }
}

#[async_trait]
impl NotificationScheduler for RecordingScheduler {
    async fn request_permission(&self) -> Result<bool, PlatformError> {
        Ok(true)
    }

    async fn schedule_one_shot(&self, reminder: &Reminder) -> Result<ReminderId, PlatformError> {
        // Suspend like a real platform call so concurrent screen operations can interleave
        tokio::task::yield_now().await;
        if self.fail_scheduling.load(Ordering::SeqCst) {
            return Err(PlatformError::Notification("scheduler offline".to_string()));
        }
        let id = ReminderId(format!("reminder-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.scheduled
            .lock()
            .unwrap()
            .push((id.clone(), reminder.clone()));
        Ok(id)
    }

    async fn cancel(&self, id: &ReminderId) -> Result<(), PlatformError> {
        tokio::task::yield_now().await;
        self.cancelled.lock().unwrap().push(id.clone());
        Ok(())
    }
}

// =============================================================================
// Audio
// =============================================================================

/// Records `load`, `play`, `pause`, `seek` and `unload` calls in order.
#[derive(Default)]
pub struct FakeAudio {
    events: Arc<Mutex<Vec<String>>>,
}

impl FakeAudio {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    /// Sounds currently loaded and not yet unloaded.
    pub fn loaded(&self) -> Vec<String> {
        let mut loaded = Vec::new();
        for event in self.events() {
            if let Some(uri) = event.strip_prefix("load ") {
                loaded.push(uri.to_string());
            } else if let Some(uri) = event.strip_prefix("unload ") {
                loaded.retain(|loaded_uri| loaded_uri != uri);
            }
        }
        loaded
    }
}

struct FakeSound {
    uri: String,
    events: Arc<Mutex<Vec<String>>>,
    playing: AtomicBool,
}

impl FakeSound {
    fn record(&self, action: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("{} {}", action, self.uri));
    }
}

#[async_trait]
impl Sound for FakeSound {
    async fn play(&self) -> Result<(), PlatformError> {
        self.playing.store(true, Ordering::SeqCst);
        self.record("play");
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlatformError> {
        self.playing.store(false, Ordering::SeqCst);
        self.record("pause");
        Ok(())
    }

    async fn seek(&self, _position: Duration) -> Result<(), PlatformError> {
        self.record("seek");
        Ok(())
    }

    async fn status(&self) -> Result<PlaybackStatus, PlatformError> {
        Ok(PlaybackStatus {
            is_loaded: true,
            is_playing: self.playing.load(Ordering::SeqCst),
            position: Duration::ZERO,
            duration: Some(Duration::from_secs(200)),
        })
    }

    async fn unload(&self) -> Result<(), PlatformError> {
        self.record("unload");
        Ok(())
    }
}

#[async_trait]
impl AudioEngine for FakeAudio {
    async fn load(&self, uri: &str) -> Result<Box<dyn Sound>, PlatformError> {
        self.events.lock().unwrap().push(format!("load {}", uri));
        Ok(Box::new(FakeSound {
            uri: uri.to_string(),
            events: Arc::clone(&self.events),
            playing: AtomicBool::new(false),
        }))
    }
}

// =============================================================================
// Picker and prompts
// =============================================================================

/// Hands out queued picks; an empty queue means the user cancelled.
#[derive(Default)]
pub struct QueuedPicker {
    picks: Mutex<VecDeque<PickedFile>>,
}

impl QueuedPicker {
    pub fn push(&self, uri: &str, name: &str) {
        self.picks
            .lock()
            .unwrap()
            .push_back(PickedFile::new(uri, Some(name.to_string())));
    }
}

#[async_trait]
impl DocumentPicker for QueuedPicker {
    async fn pick_audio(&self) -> Result<Option<PickedFile>, PlatformError> {
        Ok(self.picks.lock().unwrap().pop_front())
    }
}

/// Answers every confirmation with `answer` and records what was shown.
pub struct ScriptedPrompt {
    pub answer: AtomicBool,
    pub alerts: Mutex<Vec<(String, String)>>,
    pub confirms: Mutex<Vec<ConfirmRequest>>,
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self {
            answer: AtomicBool::new(true),
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedPrompt {
    pub fn answer(&self, confirm: bool) {
        self.answer.store(confirm, Ordering::SeqCst);
    }

    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<ConfirmRequest> {
        self.confirms.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    async fn alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        self.confirms.lock().unwrap().push(request.clone());
        self.answer.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub storage: Arc<MemoryStorage>,
    pub scheduler: Arc<RecordingScheduler>,
    pub audio: Arc<FakeAudio>,
    pub picker: Arc<QueuedPicker>,
    pub prompt: Arc<ScriptedPrompt>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        Self {
            storage: Arc::new(storage),
            scheduler: Arc::new(RecordingScheduler::default()),
            audio: Arc::new(FakeAudio::default()),
            picker: Arc::new(QueuedPicker::default()),
            prompt: Arc::new(ScriptedPrompt::default()),
            clock: Arc::new(FixedClock::new(start_of_day())),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform_with_storage(self.storage.clone())
    }

    pub fn platform_with_storage(&self, storage: Arc<dyn KeyValueStorage>) -> Platform {
        Platform::new(
            storage,
            self.scheduler.clone(),
            self.audio.clone(),
            self.picker.clone(),
            self.prompt.clone(),
        )
        .with_clock(self.clock.clone())
    }
}
