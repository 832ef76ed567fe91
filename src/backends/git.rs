//! git integration - repository URLs, validation and shallow clones
//!
//! Calls the system `git` binary. The environment is inherited so settings
//! such as `GIT_SSH_COMMAND` apply to SSH remotes.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::core::error::{CodedocError, Result};
use crate::core::render::{RenderConfig, Renderer, ToMarkdown};
use crate::core::util::{command_exists, truncate_chars};

static SSH_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(ssh://)?git@[\w.-]+[:/].+").expect("Invalid SSH_URL_RE regex"));

static URL_SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("Invalid URL_SCHEME_RE regex")
});

/// Longest stderr excerpt kept in a validation result
const DETAILS_MAX_CHARS: usize = 200;

/// Check if git is available
pub fn is_git_available() -> bool {
    command_exists("git")
}

/// Whether `url` is an SSH remote (`git@host:path` or `ssh://git@host/path`)
pub fn is_ssh_url(url: &str) -> bool {
    SSH_URL_RE.is_match(url)
}

/// Whether `source` names a remote repository rather than a local path
pub fn is_remote_url(source: &str) -> bool {
    let source = source.trim();
    is_ssh_url(source) || URL_SCHEME_RE.is_match(source)
}

/// Rewrite an SSH remote as the equivalent HTTPS URL
pub fn convert_ssh_to_https(ssh_url: &str) -> Option<String> {
    if let Some(rest) = ssh_url.strip_prefix("ssh://git@") {
        return Some(format!("https://{}", rest));
    }
    if let Some(rest) = ssh_url.strip_prefix("git@") {
        return Some(format!("https://{}", rest.replacen(':', "/", 1)));
    }
    None
}

/// Canonical form of a repository URL for duplicate detection
///
/// SSH and HTTP remotes map to HTTPS, a `.git` suffix is enforced and the
/// result is lowercased.
pub fn normalize_repo_url(repo_url: &str) -> String {
    let mut url = repo_url.trim().to_string();

    if is_ssh_url(&url) {
        if let Some(https) = convert_ssh_to_https(&url) {
            url = https;
        }
    }

    if let Some(rest) = url.strip_prefix("http://") {
        url = format!("https://{}", rest);
    }

    if !url.ends_with(".git") {
        url.push_str(".git");
    }

    url.replace("/.git", ".git").to_lowercase()
}

/// Repository name from its URL (last path segment without `.git`)
pub fn repo_name_from_url(repo_url: &str) -> String {
    let trimmed = repo_url.trim().trim_end_matches('/');
    let last = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Result of the `url normalize` command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedUrl {
    pub input: String,
    pub normalized: String,
    pub name: String,
    pub ssh: bool,
}

impl NormalizedUrl {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            normalized: normalize_repo_url(input),
            name: repo_name_from_url(input),
            ssh: is_ssh_url(input.trim()),
        }
    }
}

impl ToMarkdown for NormalizedUrl {
    fn to_markdown(&self) -> String {
        format!(
            "- input: `{}`\n- normalized: `{}`\n- name: {}\n- ssh: {}\n",
            self.input, self.normalized, self.name, self.ssh
        )
    }
}

/// Why a repository URL failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    SshAuth,
    SshHostKey,
    NotFound,
    Network,
    Unknown,
}

/// Outcome of `validate_repo_url`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlValidation {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ValidationErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_via: Option<String>,
}

impl UrlValidation {
    fn success() -> Self {
        Self {
            valid: true,
            message: "valid repository url".to_string(),
            error_type: None,
            details: None,
            validated_via: None,
        }
    }

    fn failure(kind: ValidationErrorKind, message: &str, details: String) -> Self {
        Self {
            valid: false,
            message: message.to_string(),
            error_type: Some(kind),
            details: Some(details),
            validated_via: None,
        }
    }
}

impl ToMarkdown for UrlValidation {
    fn to_markdown(&self) -> String {
        let mut output = format!(
            "- **{}**: {}\n",
            if self.valid { "valid" } else { "invalid" },
            self.message
        );
        if let Some(kind) = self.error_type {
            output.push_str(&format!("- error type: `{:?}`\n", kind));
        }
        if let Some(details) = &self.details {
            output.push_str(&format!("- details: {}\n", details));
        }
        output
    }
}

/// Map `git ls-remote` stderr to a validation failure
pub fn classify_git_failure(stderr: &str) -> UrlValidation {
    let lower = stderr.to_lowercase();

    if lower.contains("permission denied") && lower.contains("publickey") {
        UrlValidation::failure(
            ValidationErrorKind::SshAuth,
            "SSH authentication failed. Please configure SSH keys for the repository.",
            "The repository requires SSH key authentication.".to_string(),
        )
    } else if lower.contains("host key verification failed") {
        UrlValidation::failure(
            ValidationErrorKind::SshHostKey,
            "SSH host key verification failed.",
            "The SSH host key is not in known_hosts. Configure GIT_SSH_COMMAND or add the host to known_hosts.".to_string(),
        )
    } else if lower.contains("repository") && lower.contains("not found") {
        UrlValidation::failure(
            ValidationErrorKind::NotFound,
            "Repository not found or access denied.",
            "The repository does not exist or you don't have permission to access it."
                .to_string(),
        )
    } else if lower.contains("could not resolve host") || lower.contains("could not read from remote")
    {
        UrlValidation::failure(
            ValidationErrorKind::Network,
            "Network error or repository unreachable.",
            truncate_chars(stderr, DETAILS_MAX_CHARS),
        )
    } else {
        UrlValidation::failure(
            ValidationErrorKind::Unknown,
            "Invalid or inaccessible repository URL.",
            truncate_chars(stderr, DETAILS_MAX_CHARS),
        )
    }
}

/// How long `git ls-remote` may run before it is killed
pub const LS_REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long `git clone --depth 1` may run before it is killed
pub const CLONE_TIMEOUT: Duration = Duration::from_secs(300);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Result of one bounded git invocation
#[derive(Debug)]
enum GitOutcome {
    Success,
    Failed(String),
    TimedOut,
}

/// Run a prepared git command, killing it once `timeout` has elapsed
///
/// stderr is drained on a separate thread so a chatty child cannot fill the
/// pipe and stall before the deadline.
fn run_git(cmd: &mut Command, timeout: Duration) -> Result<GitOutcome> {
    if !is_git_available() {
        return Err(CodedocError::GitNotFound);
    }

    let mut child = cmd
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let started = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if started.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            // Helpers such as git-remote-https may still hold the pipe;
            // the reader thread is left to finish on its own.
            return Ok(GitOutcome::TimedOut);
        }
        thread::sleep(POLL_INTERVAL);
    };

    if status.success() {
        return Ok(GitOutcome::Success);
    }

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    Ok(GitOutcome::Failed(stderr))
}

fn ls_remote(url: &str, timeout: Duration) -> Result<GitOutcome> {
    run_git(Command::new("git").arg("ls-remote").arg(url), timeout)
}

/// Check that a remote repository exists without cloning it
///
/// SSH remotes are first tried through their HTTPS form; if that fails the
/// SSH URL itself is tried.
pub fn validate_repo_url(repo_url: &str) -> Result<UrlValidation> {
    validate_repo_url_within(repo_url, LS_REMOTE_TIMEOUT)
}

/// `validate_repo_url` with an explicit per-attempt deadline
pub fn validate_repo_url_within(repo_url: &str, timeout: Duration) -> Result<UrlValidation> {
    if is_ssh_url(repo_url) {
        if let Some(https) = convert_ssh_to_https(repo_url) {
            info!(url = repo_url, https = %https, "SSH URL detected, trying HTTPS first");
            match ls_remote(&https, timeout)? {
                GitOutcome::Success => {
                    let mut ok = UrlValidation::success();
                    ok.validated_via = Some("https_conversion".to_string());
                    return Ok(ok);
                }
                GitOutcome::Failed(stderr) => {
                    debug!(stderr = %truncate_chars(&stderr, 100), "HTTPS validation failed, trying SSH");
                }
                GitOutcome::TimedOut => {
                    debug!("HTTPS validation timed out, trying SSH");
                }
            }
        }
    }

    match ls_remote(repo_url, timeout)? {
        GitOutcome::Success => {
            info!(url = repo_url, "repository URL validated");
            Ok(UrlValidation::success())
        }
        GitOutcome::Failed(stderr) => {
            warn!(url = repo_url, stderr = %stderr.trim(), "repository URL validation failed");
            Ok(classify_git_failure(&stderr))
        }
        GitOutcome::TimedOut => {
            warn!(url = repo_url, secs = timeout.as_secs(), "repository URL validation timed out");
            Ok(UrlValidation::failure(
                ValidationErrorKind::Network,
                "Repository validation timed out.",
                format!("git ls-remote did not finish within {}s", timeout.as_secs()),
            ))
        }
    }
}

/// `git clone --depth 1 <url> <dest>`
pub fn shallow_clone(url: &str, dest: &Path) -> Result<()> {
    shallow_clone_within(url, dest, CLONE_TIMEOUT)
}

/// `shallow_clone` with an explicit deadline
pub fn shallow_clone_within(url: &str, dest: &Path, timeout: Duration) -> Result<()> {
    if std::env::var_os("GIT_SSH_COMMAND").is_some() {
        debug!("using GIT_SSH_COMMAND from environment");
    }

    let outcome = run_git(
        Command::new("git")
            .arg("clone")
            .arg("--depth")
            .arg("1")
            .arg(url)
            .arg(dest),
        timeout,
    )?;

    match outcome {
        GitOutcome::Success => Ok(()),
        GitOutcome::Failed(stderr) => Err(CodedocError::CloneFailed {
            url: url.to_string(),
            stderr: stderr.trim().to_string(),
        }),
        GitOutcome::TimedOut => Err(CodedocError::Timeout {
            command: "clone",
            secs: timeout.as_secs(),
        }),
    }
}

/// Run the `url normalize` command
pub fn run_url_normalize(url: &str, config: RenderConfig) -> anyhow::Result<()> {
    let renderer = Renderer::with_config(config);
    renderer.render_to(&NormalizedUrl::new(url), std::io::stdout().lock())?;
    Ok(())
}

/// Run the `url validate` command; an invalid URL is a failed run
pub fn run_url_validate(url: &str, config: RenderConfig) -> anyhow::Result<()> {
    let validation = validate_repo_url(url)?;

    let renderer = Renderer::with_config(config);
    renderer.render_to(&validation, std::io::stdout().lock())?;

    if !validation.valid {
        anyhow::bail!("{}", validation.message);
    }
    Ok(())
}

/// A shallow clone living in a temporary directory
///
/// The directory and everything in it are removed when this value is
/// dropped, whether or not the work using it succeeded.
#[derive(Debug)]
pub struct TempClone {
    dir: TempDir,
}

impl TempClone {
    /// Clone `url` into a fresh `repo_clone_*` temporary directory
    pub fn clone_repo(url: &str) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("repo_clone_").tempdir()?;
        info!(url, dest = %dir.path().display(), "cloning repository into temporary directory");
        shallow_clone(url, dir.path())?;
        Ok(Self { dir })
    }

    /// Wrap an existing temporary directory
    #[cfg(test)]
    pub fn from_dir(dir: TempDir) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ssh_url() {
        assert!(is_ssh_url("git@github.com:user/repo.git"));
        assert!(is_ssh_url("ssh://git@github.com/user/repo.git"));
        assert!(is_ssh_url("git@gitlab.example-host.io:group/project.git"));
        assert!(!is_ssh_url("https://github.com/user/repo.git"));
        assert!(!is_ssh_url("git@"));
    }

    #[test]
    fn test_is_remote_url() {
        assert!(is_remote_url("https://github.com/user/repo.git"));
        assert!(is_remote_url("git@github.com:user/repo.git"));
        assert!(is_remote_url("file:///srv/git/repo.git"));
        assert!(!is_remote_url("./my-projcet"));
        assert!(!is_remote_url("/home/user/repo"));
        assert!(!is_remote_url("C:\\repo"));
    }

    #[test]
    fn test_convert_ssh_to_https() {
        assert_eq!(
            convert_ssh_to_https("git@github.com:user/repo.git").as_deref(),
            Some("https://github.com/user/repo.git")
        );
        assert_eq!(
            convert_ssh_to_https("ssh://git@github.com/user/repo.git").as_deref(),
            Some("https://github.com/user/repo.git")
        );
        assert_eq!(
            convert_ssh_to_https("git@host:group/sub:weird.git").as_deref(),
            Some("https://host/group/sub:weird.git")
        );
        assert_eq!(convert_ssh_to_https("https://github.com/user/repo"), None);
    }

    #[test]
    fn test_normalize_repo_url() {
        let expected = "https://github.com/user/repo.git";
        assert_eq!(normalize_repo_url("git@github.com:User/Repo.git"), expected);
        assert_eq!(normalize_repo_url("https://github.com/user/repo.git"), expected);
        assert_eq!(normalize_repo_url("https://github.com/user/repo"), expected);
        assert_eq!(normalize_repo_url("http://github.com/user/repo.git"), expected);
        assert_eq!(normalize_repo_url("  https://github.com/user/repo/  "), expected);
        assert_eq!(
            normalize_repo_url("ssh://git@github.com/user/repo"),
            expected
        );
    }

    #[test]
    fn test_repo_name_from_url() {
        assert_eq!(repo_name_from_url("https://github.com/user/repo.git"), "repo");
        assert_eq!(repo_name_from_url("git@github.com:user/tool"), "tool");
        assert_eq!(repo_name_from_url("git@host:solo.git"), "solo");
        assert_eq!(repo_name_from_url("https://github.com/user/repo/"), "repo");
    }

    #[test]
    fn test_normalized_url_report() {
        let report = NormalizedUrl::new("git@github.com:User/Tool.git");
        assert_eq!(report.normalized, "https://github.com/user/tool.git");
        assert_eq!(report.name, "Tool");
        assert!(report.ssh);
        assert!(report.to_markdown().contains("- name: Tool\n"));
    }

    #[test]
    fn test_classify_git_failure() {
        let auth = classify_git_failure("git@github.com: Permission denied (publickey).");
        assert_eq!(auth.error_type, Some(ValidationErrorKind::SshAuth));
        assert!(!auth.valid);

        let host = classify_git_failure("Host key verification failed.");
        assert_eq!(host.error_type, Some(ValidationErrorKind::SshHostKey));

        let missing = classify_git_failure("remote: Repository not found.");
        assert_eq!(missing.error_type, Some(ValidationErrorKind::NotFound));

        let network = classify_git_failure("fatal: unable to access: Could not resolve host: nope");
        assert_eq!(network.error_type, Some(ValidationErrorKind::Network));

        let other = classify_git_failure(&"z".repeat(500));
        assert_eq!(other.error_type, Some(ValidationErrorKind::Unknown));
        assert_eq!(other.details.map(|d| d.len()), Some(200));
    }

    #[test]
    fn test_validation_serializes_snake_case() {
        let failure = classify_git_failure("Host key verification failed.");
        let json = serde_json::to_string(&failure).unwrap();
        assert!(json.contains("\"error_type\":\"ssh_host_key\""));
        assert!(json.contains("\"valid\":false"));
    }

    #[test]
    fn test_temp_clone_removed_on_drop() {
        let dir = tempfile::Builder::new()
            .prefix("repo_clone_")
            .tempdir()
            .unwrap();
        let clone = TempClone::from_dir(dir);
        let path = clone.path().to_path_buf();
        std::fs::write(path.join("README.md"), "x").unwrap();
        assert!(path.exists());

        drop(clone);
        assert!(!path.exists());
    }

    /// A listener that accepts connections and never answers
    fn silent_remote() -> (std::net::TcpListener, String) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/r.git", listener.local_addr().unwrap());
        (listener, url)
    }

    #[test]
    fn test_validate_stalled_remote_times_out() {
        if !is_git_available() {
            return;
        }
        let (_listener, url) = silent_remote();

        let started = Instant::now();
        let result = validate_repo_url_within(&url, Duration::from_secs(2)).unwrap();

        assert!(started.elapsed() < Duration::from_secs(20));
        assert!(!result.valid);
        assert_eq!(result.error_type, Some(ValidationErrorKind::Network));
        assert_eq!(result.message, "Repository validation timed out.");
    }

    #[test]
    fn test_clone_stalled_remote_times_out() {
        if !is_git_available() {
            return;
        }
        let (_listener, url) = silent_remote();
        let dest = tempfile::tempdir().unwrap();

        let started = Instant::now();
        let result = shallow_clone_within(&url, &dest.path().join("r"), Duration::from_secs(2));

        assert!(started.elapsed() < Duration::from_secs(20));
        assert!(matches!(
            result,
            Err(CodedocError::Timeout { command: "clone", secs: 2 })
        ));
    }

    #[test]
    fn test_clone_of_missing_local_repo_fails() {
        if !is_git_available() {
            return;
        }
        let missing = tempfile::tempdir().unwrap().path().join("nope");
        let result = TempClone::clone_repo(&missing.to_string_lossy());
        assert!(matches!(result, Err(CodedocError::CloneFailed { .. })));
    }
}
