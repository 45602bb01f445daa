//! Single-node placement runtime.
//!
//! Places every actor on the local host: one headless Chromium process per
//! browser, each on its own debugging port from a fixed range, with a CPU
//! capacity derived from host parallelism. Dead actors stay listed (state
//! `DEAD`) until the process exits, mirroring how a cluster substrate keeps
//! records of killed actors.
//!
//! This is the runtime the `browserstation` binary ships with; deployments
//! on an actual cluster substitute their own [`PlacementRuntime`].

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use station_protocol::BrowserInfo;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actor::BrowserActor;
use crate::discovery::ChromeEndpoint;
use crate::error::{Error, Result};
use crate::placement::{ActorDescriptor, ActorState, BrowserHandle, PlacementRuntime};

const PORT_RANGE_START: u16 = 9222;
const PORT_RANGE_END: u16 = 10221;

/// Binary names probed when `CHROME_BIN` is not set.
const CHROME_CANDIDATES: &[&str] = &[
	"chromium",
	"chromium-browser",
	"google-chrome",
	"google-chrome-stable",
	"chrome",
];

struct LocalActor {
	endpoint: ChromeEndpoint,
	state: ActorState,
	cpus: f64,
	child: Option<Child>,
	data_dir: PathBuf,
}

/// [`PlacementRuntime`] that launches Chromium processes on this host.
pub struct LocalRuntime {
	chrome: PathBuf,
	capacity: f64,
	actors: Mutex<HashMap<Uuid, LocalActor>>,
}

impl LocalRuntime {
	/// Locate a Chromium binary and size capacity to host parallelism.
	pub async fn connect() -> Result<Self> {
		let chrome = find_chrome(std::env::var_os("CHROME_BIN").map(PathBuf::from))?;
		let capacity = std::thread::available_parallelism()?.get() as f64;
		info!(chrome = %chrome.display(), capacity, "local placement runtime ready");
		Ok(Self::with_chrome(chrome, capacity))
	}

	/// Runtime with an explicit binary and CPU capacity.
	pub fn with_chrome(chrome: PathBuf, capacity: f64) -> Self {
		Self {
			chrome,
			capacity,
			actors: Mutex::new(HashMap::new()),
		}
	}

	async fn launch(&self, endpoint: &ChromeEndpoint, data_dir: &PathBuf) -> Result<Child> {
		std::fs::create_dir_all(data_dir)?;
		let mut cmd = Command::new(&self.chrome);
		cmd.arg("--headless=new")
			.arg(format!("--remote-debugging-port={}", endpoint.port))
			.arg(format!("--user-data-dir={}", data_dir.display()))
			.arg("--no-first-run")
			.arg("--no-default-browser-check")
			.arg("--disable-gpu")
			.arg("--disable-dev-shm-usage")
			.stdout(std::process::Stdio::null())
			.stderr(std::process::Stdio::null())
			.kill_on_drop(true);
		debug!(endpoint = %endpoint, "launching Chrome");
		cmd.spawn().map_err(|e| Error::Launch(e.to_string()))
	}
}

#[async_trait]
impl PlacementRuntime for LocalRuntime {
	async fn spawn_browser(&self, browser_id: Uuid, cpus: f64) -> Result<Arc<dyn BrowserHandle>> {
		let (endpoint, data_dir) = {
			let mut actors = self.actors.lock().await;
			reap_all(&mut actors);

			let reserved: f64 = actors
				.values()
				.filter(|a| a.state != ActorState::Dead)
				.map(|a| a.cpus)
				.sum();
			if reserved + cpus > self.capacity {
				return Err(Error::ResourcesExhausted {
					requested: cpus,
					available: self.capacity - reserved,
				});
			}

			let in_use: Vec<u16> = actors
				.values()
				.filter(|a| a.state != ActorState::Dead)
				.map(|a| a.endpoint.port)
				.collect();
			let port = (PORT_RANGE_START..=PORT_RANGE_END)
				.find(|p| !in_use.contains(p) && port_available(*p))
				.ok_or(Error::PortsExhausted {
					start: PORT_RANGE_START,
					end: PORT_RANGE_END,
				})?;

			let endpoint = ChromeEndpoint::new("127.0.0.1", port);
			let data_dir = std::env::temp_dir().join(format!("browserstation-{browser_id}"));
			actors.insert(
				browser_id,
				LocalActor {
					endpoint: endpoint.clone(),
					state: ActorState::Pending,
					cpus,
					child: None,
					data_dir: data_dir.clone(),
				},
			);
			(endpoint, data_dir)
		};

		// Launch outside the lock; a concurrent list sees PENDING meanwhile.
		let launched = self.launch(&endpoint, &data_dir).await;

		let mut actors = self.actors.lock().await;
		match launched {
			Ok(child) => {
				let actor = actors.get_mut(&browser_id).ok_or(Error::NotFound(browser_id))?;
				actor.child = Some(child);
				actor.state = ActorState::Alive;
				info!(%browser_id, endpoint = %endpoint, "browser actor alive");
				Ok(Arc::new(LocalHandle {
					actor: BrowserActor::new(browser_id, endpoint),
				}))
			}
			Err(err) => {
				if let Some(actor) = actors.get_mut(&browser_id) {
					actor.state = ActorState::Dead;
				}
				warn!(%browser_id, error = %err, "browser launch failed");
				Err(err)
			}
		}
	}

	async fn lookup(&self, browser_id: Uuid) -> Result<Option<Arc<dyn BrowserHandle>>> {
		let mut actors = self.actors.lock().await;
		let Some(actor) = actors.get_mut(&browser_id) else {
			return Ok(None);
		};
		reap(actor);
		if actor.state == ActorState::Dead {
			return Ok(None);
		}
		Ok(Some(Arc::new(LocalHandle {
			actor: BrowserActor::new(browser_id, actor.endpoint.clone()),
		})))
	}

	async fn list(&self) -> Result<Vec<ActorDescriptor>> {
		let mut actors = self.actors.lock().await;
		reap_all(&mut actors);
		Ok(actors
			.iter()
			.map(|(id, actor)| ActorDescriptor {
				browser_id: *id,
				state: actor.state,
			})
			.collect())
	}

	async fn kill(&self, browser_id: Uuid) -> Result<()> {
		let mut actors = self.actors.lock().await;
		let actor = actors.get_mut(&browser_id).ok_or(Error::NotFound(browser_id))?;
		reap(actor);
		if actor.state == ActorState::Dead {
			return Err(Error::NotFound(browser_id));
		}
		if let Some(mut child) = actor.child.take() {
			child.kill().await.map_err(|e| Error::Kill {
				id: browser_id,
				cause: e.to_string(),
			})?;
		}
		actor.state = ActorState::Dead;
		let _ = std::fs::remove_dir_all(&actor.data_dir);
		info!(%browser_id, "browser actor killed");
		Ok(())
	}

	async fn cluster_resources(&self) -> Result<HashMap<String, f64>> {
		Ok(HashMap::from([("CPU".to_string(), self.capacity)]))
	}

	async fn available_resources(&self) -> Result<HashMap<String, f64>> {
		let actors = self.actors.lock().await;
		let reserved: f64 = actors
			.values()
			.filter(|a| a.state != ActorState::Dead)
			.map(|a| a.cpus)
			.sum();
		Ok(HashMap::from([("CPU".to_string(), self.capacity - reserved)]))
	}

	fn is_connected(&self) -> bool {
		true
	}
}

#[derive(Debug)]
struct LocalHandle {
	actor: BrowserActor,
}

#[async_trait]
impl BrowserHandle for LocalHandle {
	fn browser_id(&self) -> Uuid {
		self.actor.browser_id()
	}

	fn endpoint(&self) -> ChromeEndpoint {
		self.actor.endpoint().clone()
	}

	async fn get_info(&self) -> Result<BrowserInfo> {
		Ok(self.actor.get_info().await)
	}
}

/// Flip an actor to DEAD once its process has exited.
fn reap(actor: &mut LocalActor) {
	if let Some(child) = actor.child.as_mut() {
		if matches!(child.try_wait(), Ok(Some(_))) {
			actor.child = None;
			actor.state = ActorState::Dead;
		}
	}
}

fn reap_all(actors: &mut HashMap<Uuid, LocalActor>) {
	for actor in actors.values_mut() {
		reap(actor);
	}
}

fn port_available(port: u16) -> bool {
	StdTcpListener::bind(("127.0.0.1", port)).is_ok()
}

fn find_chrome(override_path: Option<PathBuf>) -> Result<PathBuf> {
	if let Some(path) = override_path {
		return Ok(path);
	}
	CHROME_CANDIDATES
		.iter()
		.find_map(|name| which::which(name).ok())
		.ok_or_else(|| Error::ChromeNotFound {
			candidates: CHROME_CANDIDATES.join(", "),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bound_port_is_not_available() {
		let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
		let port = listener.local_addr().unwrap().port();
		assert!(!port_available(port));
		drop(listener);
		assert!(port_available(port));
	}

	#[test]
	fn chrome_override_wins() {
		let path = find_chrome(Some(PathBuf::from("/opt/chromium/chrome"))).unwrap();
		assert_eq!(path, PathBuf::from("/opt/chromium/chrome"));
	}

	#[tokio::test]
	async fn refuses_placement_beyond_capacity() {
		let runtime = LocalRuntime::with_chrome(PathBuf::from("/nonexistent"), 1.0);
		let err = runtime.spawn_browser(Uuid::new_v4(), 2.0).await.unwrap_err();
		assert!(matches!(err, Error::ResourcesExhausted { .. }));
	}

	#[tokio::test]
	async fn failed_launch_leaves_a_dead_actor() {
		let runtime = LocalRuntime::with_chrome(PathBuf::from("/nonexistent"), 4.0);
		let id = Uuid::new_v4();
		let err = runtime.spawn_browser(id, 1.0).await.unwrap_err();
		assert!(matches!(err, Error::Launch(_)));

		assert!(runtime.lookup(id).await.unwrap().is_none());
		let listed = runtime.list().await.unwrap();
		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].state, ActorState::Dead);

		// A dead actor frees its reservation.
		let available = runtime.available_resources().await.unwrap();
		assert_eq!(available["CPU"], 4.0);
	}

	#[tokio::test]
	async fn kill_unknown_actor_is_not_found() {
		let runtime = LocalRuntime::with_chrome(PathBuf::from("/nonexistent"), 1.0);
		let err = runtime.kill(Uuid::new_v4()).await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}
}
