//! Machine and process telemetry.
//!
//! Point-in-time snapshots of the machine the host tool runs on, shaped
//! for the `/api/machine/*` endpoints. The process list is pre-rendered
//! to the legacy line format the frontend displays verbatim.

use sysinfo::System;

use iisman_core::MachineState;

/// Captures a snapshot of host OS, CPU, and memory state.
pub fn machine_state() -> MachineState {
    let mut sys = System::new_all();
    sys.refresh_all();

    let total_memory = sys.total_memory();
    let used_memory = sys.used_memory();
    let memory_usage = if total_memory == 0 {
        0.0
    } else {
        used_memory as f64 / total_memory as f64 * 100.0
    };

    MachineState {
        os: std::env::consts::OS.to_string(),
        platform: System::name().unwrap_or_default(),
        platform_family: std::env::consts::FAMILY.to_string(),
        platform_version: System::os_version().unwrap_or_default(),
        kernel_version: System::kernel_version().unwrap_or_default(),
        kernel_arch: System::cpu_arch().unwrap_or_default(),
        hostname: System::host_name().unwrap_or_default(),
        cpus: sys.cpus().len(),
        uptime: format_uptime(System::uptime()),
        total_memory,
        available_memory: sys.available_memory(),
        used_memory,
        memory_usage,
    }
}

/// Lists running processes as pre-formatted display lines.
pub fn process_list() -> Vec<String> {
    let mut sys = System::new_all();
    sys.refresh_all();

    let mut lines: Vec<String> = sys
        .processes()
        .values()
        .map(|process| {
            format!(
                "PID: {} | Name: {} | CPU: {:.2}% | RSS: {} KB\n",
                process.pid(),
                process.name(),
                process.cpu_usage(),
                process.memory() / 1024
            )
        })
        .collect();
    lines.sort();
    lines
}

/// Renders an uptime in the `NhNmNs` shape the original API reported.
fn format_uptime(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    let mut rendered = String::new();
    if hours > 0 {
        rendered.push_str(&format!("{hours}h"));
    }
    if minutes > 0 || hours > 0 {
        rendered.push_str(&format!("{minutes}m"));
    }
    rendered.push_str(&format!("{seconds}s"));
    rendered
}
