//! Site management actions.
//!
//! Each operation assembles a WebAdministration script, runs it through
//! [`PowerShell`], and interprets the textual result. The script builders
//! are pure functions so the exact command text stays unit-testable
//! without a Windows host.

use tracing::info;

use iisman_core::{DirEntry, Website, WebsiteAction, WebsiteRequest, unsafe_script_char};

use crate::error::HostError;
use crate::listing::{ParsedListing, parse_listing};
use crate::powershell::PowerShell;

/// Number of log lines returned by [`HostController::tail_logs`].
const LOG_TAIL_LINES: usize = 50;

/// Sites are created under the default IIS content root.
const CONTENT_ROOT: &str = r"C:\inetpub\wwwroot";

/// How an update request maps onto host commands.
#[derive(Debug, Clone, PartialEq, Eq)]
enum UpdatePlan {
    /// Name, protocol, or port changed: drop the site and recreate it on
    /// the existing physical path.
    Recreate,
    /// Only the host header changed: swap the binding in place.
    Rebind,
    /// Nothing observable changed.
    Noop,
}

fn plan_update(current: &Website, name: &str, request: &WebsiteRequest) -> UpdatePlan {
    if current.name != name
        || current.binding.protocol != request.protocol
        || current.binding.port != request.port
    {
        UpdatePlan::Recreate
    } else if current.binding.host != request.host_or_domain {
        UpdatePlan::Rebind
    } else {
        UpdatePlan::Noop
    }
}

fn ensure_safe(argument: &str) -> Result<(), HostError> {
    match unsafe_script_char(argument) {
        Some(forbidden) => Err(HostError::UnsafeArgument {
            argument: argument.to_string(),
            forbidden,
        }),
        None => Ok(()),
    }
}

/// WebAdministration script text, one builder per operation.
pub(crate) mod scripts {
    use iisman_core::{Binding, Protocol, WebsiteAction};

    pub fn list_sites() -> String {
        "Import-Module WebAdministration; Get-Website".to_string()
    }

    pub fn control_site(action: WebsiteAction, site: &str) -> String {
        match action {
            WebsiteAction::Start => format!(
                r#"Import-Module WebAdministration; Start-Website -Name "{site}""#
            ),
            WebsiteAction::Stop => format!(
                r#"Import-Module WebAdministration; Stop-Website -Name "{site}""#
            ),
            WebsiteAction::Restart => format!(
                r#"Import-Module WebAdministration; Stop-Website -Name "{site}"; Start-Website -Name "{site}""#
            ),
        }
    }

    pub fn probe_binding(protocol: Protocol, port: u32, host: &str) -> String {
        format!(
            r#"Import-Module WebAdministration; Get-WebBinding | Where-Object {{ $_.protocol -eq "{protocol}" -and $_.bindingInformation -like "*:{port}:{host}" }}"#
        )
    }

    pub fn create_site(name: &str, port: u32, path: &str) -> String {
        format!(
            r#"Import-Module WebAdministration; if (-Not (Test-Path "{path}")) {{ New-Item -Path "{path}" -ItemType Directory | Out-Null }}; New-Website -Name "{name}" -Port {port} -PhysicalPath "{path}" -ApplicationPool "DefaultAppPool""#
        )
    }

    pub fn remove_site(name: &str) -> String {
        format!(r#"Import-Module WebAdministration; Remove-Website -Name "{name}""#)
    }

    pub fn rebind_site(original: &str, name: &str, current: &Binding, request_host: &str) -> String {
        format!(
            r#"Import-Module WebAdministration; try {{ Remove-WebBinding -Name "{original}" -Protocol "{protocol}" -Port {port} -HostHeader "{old_host}" -ErrorAction SilentlyContinue }} catch {{}}; New-WebBinding -Name "{name}" -Protocol "{protocol}" -Port {port} -IPAddress * -HostHeader "{request_host}""#,
            protocol = current.protocol,
            port = current.port,
            old_host = current.host,
        )
    }

    pub fn delete_site_with_content(name: &str) -> String {
        format!(
            r#"Import-Module WebAdministration; $site = Get-Website -Name "{name}"; $path = $site.physicalPath; Remove-Website -Name "{name}"; if (Test-Path $path) {{ Remove-Item -Path $path -Recurse -Force }}"#
        )
    }

    pub fn tail_logs(site_id: i64, lines: usize) -> String {
        format!(
            r#"$logPath = "C:\inetpub\logs\LogFiles\W3SVC{site_id}"; Get-Content (Get-ChildItem $logPath -Recurse | Sort-Object LastWriteTime -Descending | Select-Object -First 1).FullName -Tail {lines}"#
        )
    }

    pub fn list_directory(path: &str) -> String {
        format!(
            r#"Get-ChildItem -Path "{path}" | ForEach-Object {{ $item = $_; [PSCustomObject]@{{ Name = $item.Name; Size = if ($item.PSIsContainer) {{ 0 }} else {{ $item.Length }}; IsDir = $item.PSIsContainer; ModTime = $item.LastWriteTime.ToString("yyyy-MM-dd HH:mm:ss"); Permission = ((Get-Acl $item.FullName).Access | Select-Object -First 1 | ForEach-Object {{ $_.FileSystemRights.ToString() }}) }} }} | ConvertTo-Json -Depth 2"#
        )
    }
}

/// Runs site management operations against the local IIS host.
#[derive(Debug, Clone, Default)]
pub struct HostController {
    shell: PowerShell,
}

impl HostController {
    pub fn new(shell: PowerShell) -> Self {
        Self { shell }
    }

    /// Lists all sites the host reports.
    ///
    /// The listing is re-fetched and re-parsed on every call; there is no
    /// cache to invalidate.
    pub fn list_sites(&self) -> Result<ParsedListing, HostError> {
        let output = self.shell.run_checked(&scripts::list_sites())?;
        Ok(parse_listing(&output.stdout)?)
    }

    /// Finds one site by exact name.
    pub fn get_site(&self, name: &str) -> Result<Website, HostError> {
        self.list_sites()?
            .sites
            .into_iter()
            .find(|site| site.name == name)
            .ok_or_else(|| HostError::SiteNotFound(name.to_string()))
    }

    pub fn site_exists(&self, name: &str) -> Result<bool, HostError> {
        Ok(self
            .list_sites()?
            .sites
            .iter()
            .any(|site| site.name == name))
    }

    pub fn site_exists_by_id(&self, id: i64) -> Result<bool, HostError> {
        Ok(self.list_sites()?.sites.iter().any(|site| site.id == id))
    }

    /// Starts, stops, or restarts a site.
    pub fn control_site(&self, action: WebsiteAction, site: &str) -> Result<(), HostError> {
        ensure_safe(site)?;
        self.shell
            .run_checked(&scripts::control_site(action, site))?;
        info!(site, %action, "Applied website action");
        Ok(())
    }

    /// Creates a new site under the IIS content root.
    ///
    /// Spaces are stripped from the name for host-tool compatibility, and
    /// a binding probe rejects duplicates before anything is created.
    pub fn create_site(&self, request: &WebsiteRequest) -> Result<(), HostError> {
        let name = request.name.replace(' ', "");
        ensure_safe(&name)?;
        ensure_safe(&request.host_or_domain)?;

        let probe = scripts::probe_binding(request.protocol, request.port, &request.host_or_domain);
        if let Ok(output) = self.shell.run(&probe) {
            if output.success() && !output.combined().trim().is_empty() {
                return Err(HostError::BindingExists {
                    protocol: request.protocol,
                    host: request.host_or_domain.clone(),
                    port: request.port,
                });
            }
        }

        let path = format!(r"{CONTENT_ROOT}\{name}");
        self.shell
            .run_checked(&scripts::create_site(&name, request.port, &path))?;
        info!(site = %name, port = request.port, "Created website");
        Ok(())
    }

    /// Applies an update request to an existing site.
    pub fn update_site(&self, original: &str, request: &WebsiteRequest) -> Result<(), HostError> {
        let name = request.name.replace(' ', "");
        ensure_safe(original)?;
        ensure_safe(&name)?;
        ensure_safe(&request.host_or_domain)?;

        let current = self.get_site(original)?;
        match plan_update(&current, &name, request) {
            UpdatePlan::Recreate => {
                self.shell.run_checked(&scripts::remove_site(original))?;
                self.shell.run_checked(&scripts::create_site(
                    &name,
                    request.port,
                    &current.physical_path,
                ))?;
                info!(original, site = %name, "Recreated website with new configuration");
            }
            UpdatePlan::Rebind => {
                self.shell.run_checked(&scripts::rebind_site(
                    original,
                    &name,
                    &current.binding,
                    &request.host_or_domain,
                ))?;
                info!(site = %name, host = %request.host_or_domain, "Replaced website binding");
            }
            UpdatePlan::Noop => {}
        }
        Ok(())
    }

    /// Deletes a site and its physical directory.
    pub fn delete_site(&self, name: &str) -> Result<(), HostError> {
        ensure_safe(name)?;
        if !self.site_exists(name)? {
            return Err(HostError::SiteNotFound(name.to_string()));
        }
        self.shell
            .run_checked(&scripts::delete_site_with_content(name))?;
        info!(site = name, "Deleted website");
        Ok(())
    }

    /// Returns the last lines of the newest W3SVC log for a site.
    pub fn tail_logs(&self, site: &str) -> Result<String, HostError> {
        let website = self.get_site(site)?;
        let output = self
            .shell
            .run_checked(&scripts::tail_logs(website.id, LOG_TAIL_LINES))?;
        Ok(output.stdout)
    }

    /// Lists a site's physical directory, or a subtree of it.
    pub fn list_directory(
        &self,
        site: &str,
        subtree: Option<&str>,
    ) -> Result<Vec<DirEntry>, HostError> {
        let website = self.get_site(site)?;
        let path = match subtree {
            Some(subtree) if !subtree.is_empty() => {
                join_under_root(&website.physical_path, subtree)?
            }
            _ => website.physical_path,
        };
        let output = self.shell.run_checked(&scripts::list_directory(&path))?;
        decode_dir_entries(&output.stdout)
    }
}

/// Joins a requested subtree onto the site root, refusing anything that
/// could resolve outside it.
fn join_under_root(root: &str, subtree: &str) -> Result<String, HostError> {
    ensure_safe(subtree)?;
    let normalized = subtree.replace('/', "\\");
    let escapes = normalized
        .split('\\')
        .any(|component| component == ".." || component.ends_with(':'));
    if escapes || normalized.starts_with('\\') {
        return Err(HostError::PathTraversal(subtree.to_string()));
    }
    Ok(format!("{root}\\{normalized}"))
}

/// Decodes `ConvertTo-Json` output, which emits a bare object for a
/// single entry, an array otherwise, and nothing at all for an empty
/// directory.
fn decode_dir_entries(stdout: &str) -> Result<Vec<DirEntry>, HostError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    let single: DirEntry = serde_json::from_str(trimmed)?;
    Ok(vec![single])
}

#[cfg(test)]
mod tests {
    use super::*;
    use iisman_core::{Binding, Protocol};

    fn website(name: &str, protocol: Protocol, port: u32, host: &str) -> Website {
        Website {
            name: name.to_string(),
            id: 7,
            state: "Started".to_string(),
            physical_path: format!(r"C:\inetpub\wwwroot\{name}"),
            binding: Binding {
                protocol,
                port,
                host: host.to_string(),
                ssl: false,
            },
        }
    }

    fn request(name: &str, protocol: Protocol, port: u32, host: &str) -> WebsiteRequest {
        WebsiteRequest {
            name: name.to_string(),
            protocol,
            host_or_domain: host.to_string(),
            port,
        }
    }

    #[test]
    fn test_control_scripts_quote_the_site_name() {
        let start = scripts::control_site(WebsiteAction::Start, "blog");
        assert_eq!(
            start,
            r#"Import-Module WebAdministration; Start-Website -Name "blog""#
        );

        let restart = scripts::control_site(WebsiteAction::Restart, "blog");
        assert!(restart.contains(r#"Stop-Website -Name "blog""#));
        assert!(restart.contains(r#"Start-Website -Name "blog""#));
    }

    #[test]
    fn test_create_script_creates_directory_before_site() {
        let script = scripts::create_site("blog", 8080, r"C:\inetpub\wwwroot\blog");
        assert!(script.contains(r#"Test-Path "C:\inetpub\wwwroot\blog""#));
        assert!(script.contains("New-Item"));
        assert!(script.contains(
            r#"New-Website -Name "blog" -Port 8080 -PhysicalPath "C:\inetpub\wwwroot\blog" -ApplicationPool "DefaultAppPool""#
        ));
    }

    #[test]
    fn test_probe_binding_script_matches_protocol_port_host() {
        let script = scripts::probe_binding(Protocol::Https, 443, "blog.corp.local");
        assert!(script.contains(r#"$_.protocol -eq "https""#));
        assert!(script.contains(r#"-like "*:443:blog.corp.local""#));
    }

    #[test]
    fn test_tail_logs_script_targets_the_site_log_directory() {
        let script = scripts::tail_logs(3, 50);
        assert!(script.contains(r"C:\inetpub\logs\LogFiles\W3SVC3"));
        assert!(script.contains("-Tail 50"));
    }

    #[test]
    fn test_plan_update_recreates_on_rename_protocol_or_port_change() {
        let current = website("blog", Protocol::Http, 80, "localhost");

        let renamed = request("journal", Protocol::Http, 80, "localhost");
        assert_eq!(plan_update(&current, "journal", &renamed), UpdatePlan::Recreate);

        let new_port = request("blog", Protocol::Http, 8080, "localhost");
        assert_eq!(plan_update(&current, "blog", &new_port), UpdatePlan::Recreate);

        let new_protocol = request("blog", Protocol::Https, 80, "localhost");
        assert_eq!(
            plan_update(&current, "blog", &new_protocol),
            UpdatePlan::Recreate
        );
    }

    #[test]
    fn test_plan_update_rebinds_on_host_only_change() {
        let current = website("blog", Protocol::Http, 80, "localhost");
        let new_host = request("blog", Protocol::Http, 80, "blog.corp.local");
        assert_eq!(plan_update(&current, "blog", &new_host), UpdatePlan::Rebind);
    }

    #[test]
    fn test_plan_update_noop_when_nothing_changed() {
        let current = website("blog", Protocol::Http, 80, "localhost");
        let same = request("blog", Protocol::Http, 80, "localhost");
        assert_eq!(plan_update(&current, "blog", &same), UpdatePlan::Noop);
    }

    #[test]
    fn test_ensure_safe_rejects_quote_breakers() {
        let error = ensure_safe(r#"blog"; Remove-Item C:\"#).unwrap_err();
        assert!(matches!(
            error,
            HostError::UnsafeArgument {
                forbidden: '"',
                ..
            }
        ));
        assert!(ensure_safe("plain-name_01.corp").is_ok());
    }

    #[test]
    fn test_join_under_root_rejects_traversal() {
        assert_eq!(
            join_under_root(r"C:\inetpub\wwwroot\blog", "assets/img").unwrap(),
            r"C:\inetpub\wwwroot\blog\assets\img"
        );
        assert!(matches!(
            join_under_root(r"C:\inetpub\wwwroot\blog", "../secrets"),
            Err(HostError::PathTraversal(_))
        ));
        assert!(matches!(
            join_under_root(r"C:\inetpub\wwwroot\blog", r"\windows"),
            Err(HostError::PathTraversal(_))
        ));
        assert!(matches!(
            join_under_root(r"C:\inetpub\wwwroot\blog", r"D:\other"),
            Err(HostError::PathTraversal(_))
        ));
    }

    #[test]
    fn test_decode_dir_entries_handles_array_single_and_empty() {
        let array = r#"[{"Name":"a.txt","Size":1,"IsDir":false,"ModTime":"t","Permission":"FullControl"},
                        {"Name":"sub","Size":0,"IsDir":true,"ModTime":"t","Permission":"FullControl"}]"#;
        let entries = decode_dir_entries(array).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].is_dir);

        let single = r#"{"Name":"only.txt","Size":9,"IsDir":false,"ModTime":"t","Permission":"Read"}"#;
        let entries = decode_dir_entries(single).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "only.txt");

        assert!(decode_dir_entries("   \n").unwrap().is_empty());
        assert!(decode_dir_entries("not json").is_err());
    }

    #[test]
    fn test_rebind_script_swaps_old_binding_for_new_host() {
        let current = Binding {
            protocol: Protocol::Http,
            port: 80,
            host: "localhost".to_string(),
            ssl: false,
        };
        let script = scripts::rebind_site("blog", "blog", &current, "blog.corp.local");
        assert!(script.contains(r#"Remove-WebBinding -Name "blog" -Protocol "http" -Port 80 -HostHeader "localhost""#));
        assert!(script.contains(r#"New-WebBinding -Name "blog" -Protocol "http" -Port 80 -IPAddress * -HostHeader "blog.corp.local""#));
    }
}
