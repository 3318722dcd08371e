use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tempfile::TempDir;

/// A fixture with enough variety to exercise the serializers: resolvable and
/// unresolvable dates, missing spouses, a dangling xref, non-ASCII names and
/// an empty second tree.
pub const TREE_FIXTURE: &str = r#"{
    "trees": [
        {
            "id": 1,
            "name": "demo",
            "individuals": [
                {"xref": "I1", "name": "José García", "sex": "M",
                 "birth": {"date": "12 JAN 1900", "place": "Sevilla, España"},
                 "death": {"date": "3 MAY 1975", "place": "Madrid, España"}},
                {"xref": "I2", "name": "Marie Dupont", "sex": "F",
                 "birth": {"date": "ABT 1902", "place": "Lyon, France"}},
                {"xref": "I3", "name": "John Smith", "sex": "M",
                 "birth": {"date": "sometime"}},
                {"xref": "I4", "name": "Anna Keller", "sex": "F"},
                {"xref": "I5", "name": "Lars Nilsson", "sex": "M",
                 "birth": {"date": "1930"}}
            ],
            "families": [
                {"xref": "F1", "husband": "I1", "wife": "I2",
                 "marriage": {"date": "JUN 1925", "place": "Paris, France"},
                 "children": ["I3", "I4"]},
                {"xref": "F2", "wife": "I4"},
                {"xref": "F3", "husband": "I99",
                 "marriage": {"date": "someday"}}
            ]
        },
        {"id": 2, "name": "vacant"}
    ]
}"#;

pub const TEST_API_KEY: &str = "1f4c9d58e27a4b31905c7e6a8d2f0b4c1f4c9d58e27a4b31905c7e6a8d2f0b4c";

/// How the spawned server's settings file is seeded.
pub struct ServerOptions {
    pub enabled: bool,
    pub api_key: Option<&'static str>,
    pub logging: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: Some(TEST_API_KEY),
            logging: false,
        }
    }
}

pub struct TestServer {
    pub base_url: String,
    dir: TempDir,
    child: Child,
}

impl TestServer {
    pub fn log_path(&self) -> std::path::PathBuf {
        self.dir.path().join("api-requests.log")
    }

    fn spawn(options: &ServerOptions) -> Result<Self> {
        let dir = TempDir::new().context("failed to create temp dir")?;

        let data_file = dir.path().join("trees.json");
        std::fs::write(&data_file, TREE_FIXTURE).context("failed to write tree fixture")?;

        let enabled = if options.enabled { "1" } else { "0" };
        let logging = if options.logging { "1" } else { "0" };
        let mut settings = serde_json::Map::new();
        settings.insert("API_ENABLED".into(), enabled.into());
        settings.insert("LOG_REQUESTS".into(), logging.into());
        if let Some(key) = options.api_key {
            settings.insert("API_KEY".into(), key.into());
        }
        let settings_file = dir.path().join("settings.json");
        std::fs::write(
            &settings_file,
            serde_json::to_string_pretty(&settings).expect("settings fixture"),
        )
        .context("failed to write settings fixture")?;

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built server binary to keep startup fast
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_lineage-api"));
        cmd.env("LINEAGE_API_PORT", port.to_string())
            .env("LINEAGE_DATA_FILE", &data_file)
            .env("LINEAGE_SETTINGS_FILE", &settings_file)
            .env("LINEAGE_LOG_FILE", dir.path().join("api-requests.log"))
            .env("LINEAGE_BASE_URL", &base_url)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            base_url,
            dir,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn start_server(options: ServerOptions) -> Result<TestServer> {
    let server = TestServer::spawn(&options)?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
