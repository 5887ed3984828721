#![allow(missing_docs, clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Isolated working directory plus a config pointing at a mock server.
#[allow(dead_code)]
pub struct Workspace {
    pub dir: TempDir,
    pub config: PathBuf,
    pub document: PathBuf,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new(server: &MockServer) -> Self {
        let dir = tempfile::tempdir().expect("failed to create workspace dir");
        let config = dir.path().join("skillsync.toml");
        let document = dir.path().join("SKILL.md");
        std::fs::write(
            &config,
            format!(
                "sitemap_url = \"{uri}/sitemap.xml\"\nbase_url = \"{uri}/\"\ndocument = \"{doc}\"\n\n[check]\nbatch_size = 4\ntimeout_secs = 5\n",
                uri = server.uri(),
                doc = document.display(),
            ),
        )
        .expect("failed to write config");
        Self {
            dir,
            config,
            document,
        }
    }

    /// `skillsync --config <config>` running inside the workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = skillsync_cmd(self.dir.path());
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    pub fn read_document(&self) -> String {
        std::fs::read_to_string(&self.document).expect("document should exist")
    }
}

/// A `skillsync` command isolated from the developer's environment.
#[allow(dead_code)]
pub fn skillsync_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("skillsync"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.current_dir(cwd);
    cmd.env("HOME", cwd);
    cmd.env("XDG_CONFIG_HOME", cwd.join(".config"));
    cmd.env_remove("SKILLSYNC_CONFIG");
    cmd.env_remove("SKILLSYNC_DOCUMENT");
    cmd.env_remove("SKILLSYNC_OUTPUT_FORMAT");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Serve a sitemap listing `paths` under the mock server's own origin.
#[allow(dead_code)]
pub async fn serve_sitemap(server: &MockServer, lastmod: &str, paths: &[&str]) {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset>\n");
    for p in paths {
        xml.push_str(&format!(
            "  <url><loc>{}/{p}</loc><lastmod>{lastmod}</lastmod></url>\n",
            server.uri()
        ));
    }
    xml.push_str("</urlset>\n");

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml))
        .mount(server)
        .await;
}
