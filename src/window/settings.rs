//! Window settings

/// Settings for creating a sample window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSettings {
    pub title: String,
    /// Initial size (width, height) in logical pixels.
    pub size: (u32, u32),
    pub resizable: bool,
    /// Present with vsync. Off lets the frame rate run free.
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "cubeworks".to_string(),
            size: (1280, 720),
            resizable: true,
            vsync: true,
        }
    }
}

impl WindowSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let settings = WindowSettings::new()
            .title("17-drawstress")
            .size(800, 600)
            .vsync(false);
        assert_eq!(settings.title, "17-drawstress");
        assert_eq!(settings.size, (800, 600));
        assert!(settings.resizable);
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }
}
