use std::fmt;
use std::process::Command;
use tracing::info;

/// Compute device shared by the separation and alignment stages
///
/// Selected once per run and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// GPU-accelerated compute (CUDA)
    Accelerated,
    /// CPU fallback
    Fallback,
}

impl Device {
    /// Detect the best available device by probing for a usable GPU
    pub fn detect() -> Self {
        let gpu_available = Command::new("nvidia-smi")
            .arg("-L")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);

        if gpu_available {
            info!("GPU detected, using accelerated compute");
            Device::Accelerated
        } else {
            info!("No GPU detected, falling back to CPU");
            Device::Fallback
        }
    }

    /// Device argument value understood by the external tools
    pub fn as_arg(&self) -> &'static str {
        match self {
            Device::Accelerated => "cuda",
            Device::Fallback => "cpu",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_arg())
    }
}
