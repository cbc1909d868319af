/// D3D11 debug layer - drains the device info queue into the engine logger
///
/// Only compiled with the `d3d11-debug-layer` feature. The device is then
/// created with `D3D11_CREATE_DEVICE_DEBUG`; its messages are fetched from
/// `ID3D11InfoQueue` after each present and on shutdown, logged under
/// `ember3d::d3d11::debug`, and counted for the end-of-run report.

use colored::*;
use ember_3d_engine::{engine_debug, engine_error, engine_info, engine_warn};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use windows::core::Interface;
use windows::Win32::Graphics::Direct3D11::*;

use crate::d3d11_context::GpuContext;

const SOURCE: &str = "ember3d::d3d11::debug";

/// Global debug layer statistics
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Occurrences per message text, for grouping repeated messages
static MESSAGE_TRACKER: Mutex<Option<FxHashMap<String, u32>>> = Mutex::new(None);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMessageSeverity {
    Corruption,
    Error,
    Warning,
    Info,
    Message,
}

impl DebugMessageSeverity {
    fn from_native(severity: D3D11_MESSAGE_SEVERITY) -> Self {
        match severity {
            D3D11_MESSAGE_SEVERITY_CORRUPTION => DebugMessageSeverity::Corruption,
            D3D11_MESSAGE_SEVERITY_ERROR => DebugMessageSeverity::Error,
            D3D11_MESSAGE_SEVERITY_WARNING => DebugMessageSeverity::Warning,
            D3D11_MESSAGE_SEVERITY_INFO => DebugMessageSeverity::Info,
            _ => DebugMessageSeverity::Message,
        }
    }
}

/// Message counts since the last `init_debug_layer`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugLayerStats {
    /// Corruption messages are counted as errors
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub messages: u32,
}

impl DebugLayerStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.messages
    }
}

struct DebugStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    messages: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            messages: AtomicU32::new(0),
        }
    }

    fn increment(&self, severity: DebugMessageSeverity) {
        let counter = match severity {
            DebugMessageSeverity::Corruption | DebugMessageSeverity::Error => &self.errors,
            DebugMessageSeverity::Warning => &self.warnings,
            DebugMessageSeverity::Info => &self.info,
            DebugMessageSeverity::Message => &self.messages,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> DebugLayerStats {
        DebugLayerStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.messages.store(0, Ordering::Relaxed);
    }
}

/// Reset statistics and the message tracker
pub fn init_debug_layer() {
    DEBUG_STATS.reset();
    if let Ok(mut tracker) = MESSAGE_TRACKER.lock() {
        *tracker = Some(FxHashMap::default());
    }
}

pub fn get_debug_layer_stats() -> DebugLayerStats {
    DEBUG_STATS.get_stats()
}

/// Count and log one debug layer message; returns how often it has been seen
pub(crate) fn record_message(severity: DebugMessageSeverity, text: &str) -> u32 {
    DEBUG_STATS.increment(severity);

    let occurrences = match MESSAGE_TRACKER.lock() {
        Ok(mut tracker) => {
            let count = tracker
                .get_or_insert_with(FxHashMap::default)
                .entry(text.to_string())
                .or_insert(0);
            *count += 1;
            *count
        }
        Err(_) => 1,
    };

    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };

    match severity {
        DebugMessageSeverity::Corruption => engine_error!(SOURCE, "CORRUPTION: {}{}", text, repeat),
        DebugMessageSeverity::Error => engine_error!(SOURCE, "{}{}", text, repeat),
        DebugMessageSeverity::Warning => engine_warn!(SOURCE, "{}{}", text, repeat),
        DebugMessageSeverity::Info => engine_info!(SOURCE, "{}{}", text, repeat),
        DebugMessageSeverity::Message => engine_debug!(SOURCE, "{}{}", text, repeat),
    }

    occurrences
}

/// Fetch, log and clear every stored info queue message
pub(crate) fn drain_info_queue(ctx: &GpuContext) {
    // Missing when the debug layer is not installed
    let Ok(queue) = ctx.device.cast::<ID3D11InfoQueue>() else {
        return;
    };

    unsafe {
        let count = queue.GetNumStoredMessages();
        for index in 0..count {
            let mut length = 0usize;
            if queue.GetMessage(index, None, &mut length).is_err() || length == 0 {
                continue;
            }

            // D3D11_MESSAGE is followed by its description in the same allocation
            let mut storage = vec![0u64; length.div_ceil(std::mem::size_of::<u64>())];
            let message = storage.as_mut_ptr() as *mut D3D11_MESSAGE;
            if queue.GetMessage(index, Some(message), &mut length).is_err() {
                continue;
            }

            let message = &*message;
            let text = if message.pDescription.is_null() {
                String::new()
            } else {
                let bytes = std::slice::from_raw_parts(message.pDescription, message.DescriptionByteLength);
                String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string()
            };

            record_message(DebugMessageSeverity::from_native(message.Severity), &text);
        }
        queue.ClearStoredMessages();
    }
}

/// Print the debug layer statistics report
pub fn print_debug_layer_report() {
    let stats = get_debug_layer_stats();

    if stats.total() == 0 {
        println!("\n{}", "No D3D11 debug layer messages".green().bold());
        return;
    }

    println!("\n{}", "=== D3D11 Debug Layer Report ===".bright_blue().bold());

    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.messages > 0 {
        println!("  {} {}", "Messages:".bright_black(), stats.messages);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());

    if let Ok(tracker) = MESSAGE_TRACKER.lock() {
        if let Some(tracker) = tracker.as_ref() {
            let repeated = tracker.values().filter(|&&count| count > 1).count();
            if repeated > 0 {
                println!("\n  {} message(s) appeared multiple times", repeated);
            }
        }
    }

    println!("{}\n", "================================".bright_blue().bold());
}

#[cfg(test)]
#[path = "d3d11_debug_tests.rs"]
mod tests;
