use rand::rngs::StdRng;
use rand::SeedableRng;
use sim::{Storage, World};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// How often a paused world checks whether it should run again
const PAUSE_POLL: Duration = Duration::from_millis(100);

pub type SharedWorld = Arc<Mutex<World>>;

/// A background task that can be stopped explicitly
pub struct TaskHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn cancel(self) {
        tracing::debug!("Stopping {} task", self.name);
        self.handle.abort();
    }
}

/// Time between frames at `fps`; `None` while paused
pub fn frame_delay(fps: u32) -> Option<Duration> {
    if fps == 0 {
        None
    } else {
        Some(Duration::from_secs_f64(1.0 / fps as f64))
    }
}

/// Tick the world at its configured rate and hand every new state to
/// `on_frame`. A rate of zero pauses until the config changes.
pub fn spawn_frames<F>(world: SharedWorld, mut on_frame: F) -> TaskHandle
where
    F: FnMut(&World) + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut rng = StdRng::from_entropy();
        loop {
            let delay = {
                let mut world = world.lock().await;
                let delay = frame_delay(world.config().fps);
                if delay.is_some() {
                    world.tick(&mut rng);
                    on_frame(&world);
                }
                delay
            };
            tokio::time::sleep(delay.unwrap_or(PAUSE_POLL)).await;
        }
    });

    TaskHandle {
        name: "frame",
        handle,
    }
}

/// Save the world every `interval`. Failures are logged and the timer keeps
/// running.
pub fn spawn_saver<S>(world: SharedWorld, mut storage: S, interval: Duration) -> TaskHandle
where
    S: Storage + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; there is nothing new to save yet
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let world = world.lock().await;
            if let Err(e) = world.save(&mut storage) {
                tracing::warn!("Periodic save failed: {}", e);
            }
        }
    });

    TaskHandle {
        name: "save",
        handle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{GridConfig, SimConfig, SNAPSHOT_KEY};
    use sim::FileStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared_world(fps: u32) -> SharedWorld {
        let config = SimConfig {
            snake_count: 4,
            fps,
            grid: GridConfig { size: 1, gap: 0 },
        };
        Arc::new(Mutex::new(World::new(config, 40, 30)))
    }

    #[test]
    fn test_frame_delay() {
        assert_eq!(frame_delay(0), None);
        assert_eq!(frame_delay(10), Some(Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_frames_tick_the_world() {
        let world = shared_world(200);
        let frames = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&frames);

        let task = spawn_frames(Arc::clone(&world), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(200)).await;
        task.cancel();

        let ticks = world.lock().await.stats().ticks;
        assert!(ticks > 0);
        assert_eq!(frames.load(Ordering::SeqCst) as u64, ticks);
    }

    #[tokio::test]
    async fn test_zero_fps_pauses() {
        let world = shared_world(0);
        let task = spawn_frames(Arc::clone(&world), |_| {});
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(world.lock().await.stats().ticks, 0);

        // Raising the rate resumes the loop
        {
            let mut guard = world.lock().await;
            let mut config = guard.config().clone();
            config.fps = 200;
            guard.update_config(config);
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
        task.cancel();

        assert!(world.lock().await.stats().ticks > 0);
    }

    #[tokio::test]
    async fn test_saver_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let world = shared_world(0);
        {
            let mut guard = world.lock().await;
            let mut rng = StdRng::seed_from_u64(5);
            guard.replenish(&mut rng);
        }

        let task = spawn_saver(Arc::clone(&world), storage.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;
        task.cancel();

        let saved = storage.get(SNAPSHOT_KEY).unwrap().expect("snapshot saved");
        let snapshot = shared::Snapshot::from_json(&saved).unwrap();
        assert_eq!(snapshot.snake_list.len(), 4);
    }

    #[tokio::test]
    async fn test_cancel_stops_task() {
        let world = shared_world(100);
        let task = spawn_frames(Arc::clone(&world), |_| {});
        tokio::time::sleep(Duration::from_millis(50)).await;
        task.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let ticks = world.lock().await.stats().ticks;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(world.lock().await.stats().ticks, ticks);
    }
}
