use rand::Rng;

/// Launch profile for the automated browser session.
///
/// Mirrors the options a manual test run would use: a realistic desktop
/// user agent, a fixed desktop window size, and the Chromium switches
/// needed to keep the booking site from flagging the session.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
}

impl LaunchProfile {
    /// Generate a launch profile with a randomized desktop user agent.
    pub fn randomized() -> Self {
        let mut rng = rand::thread_rng();

        // Common desktop user agents
        let user_agents = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ];

        let ua_idx = rng.gen_range(0..user_agents.len());

        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            user_agent: user_agents[ua_idx].to_string(),
        }
    }

    /// Toggle headless mode (headed is useful for debugging a flaky flow).
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the browser window size.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Chromium command-line switches for this profile.
    pub(crate) fn chrome_args(&self) -> Vec<String> {
        vec![
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--user-agent={}", self.user_agent),
        ]
    }
}

impl Default for LaunchProfile {
    fn default() -> Self {
        Self::randomized()
    }
}
