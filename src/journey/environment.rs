//! One-time check environment setup
//!
//! Applied before the first step runs: implicit wait timeout, device and
//! browser detection, and desktop viewport sizing. Side effects only; any
//! driver failure here aborts the run before a single step executes.

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::common::config::Config;
use crate::common::Result;
use crate::driver::Driver;

/// In-page script reporting the simulated device's signals
const DEVICE_SCRIPT: &str = "return { userAgent: window.navigator.userAgent, \
                             width: window.screen.width, height: window.screen.height };";

/// Screen dimension below which a mobile device counts as a phone
const SMALL_DEVICE_PX: u32 = 500;

/// Device signals reported by the browser
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeviceReport {
    #[serde(rename = "userAgent")]
    pub user_agent: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceClass {
    fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Apply the configured check settings to the driver, exactly once per run
pub(crate) async fn configure(driver: &dyn Driver, config: &Config) -> Result<()> {
    info!("=====[ SYNTHETIC CHECK SETTINGS ]======");

    if let Some(secs) = config.check.implicit_timeout_secs {
        info!(
            "Setting implicit timeout to {secs} second{}.",
            if secs == 1 { "" } else { "s" }
        );
        driver
            .set_implicit_timeout(Duration::from_secs(secs))
            .await?;
    } else {
        info!("Using the default implicit timeout of 10 seconds.");
    }

    let device: DeviceReport = serde_json::from_value(driver.execute(DEVICE_SCRIPT).await?)?;

    let version = browser_major_version(&device.user_agent, &config.webdriver.browser)
        .unwrap_or_else(|| "?".to_string());
    info!(
        "Using {} v{version} as the browser.",
        display_name(&config.webdriver.browser)
    );

    match classify(&device) {
        DeviceClass::Desktop => {
            info!("Running this check as a desktop browser.");
            resize_desktop_viewport(driver, config).await?;
        }
        class => {
            info!(
                "Running this check as a {} browser in {} mode ({} x {}).",
                class.as_str(),
                orientation(&device).as_str(),
                device.width,
                device.height
            );
        }
    }

    Ok(())
}

/// Resize the desktop viewport when a configured dimension differs from the
/// current one; an unconfigured dimension keeps its current value
async fn resize_desktop_viewport(driver: &dyn Driver, config: &Config) -> Result<()> {
    let current = driver.viewport().await?;
    let mut target = current;
    let mut resize = false;

    if let Some(width) = config.check.viewport_width {
        if width != current.width {
            target.width = width;
            resize = true;
        }
    }
    if let Some(height) = config.check.viewport_height {
        if height != current.height {
            target.height = height;
            resize = true;
        }
    }

    if resize {
        info!("Changing the viewport size of the desktop browser to {target}.");
        driver.set_viewport(target).await?;
    } else {
        info!("Using the default viewport size of the desktop browser of {current}.");
    }
    Ok(())
}

fn classify(device: &DeviceReport) -> DeviceClass {
    if !is_mobile(&device.user_agent) {
        DeviceClass::Desktop
    } else if device.width < SMALL_DEVICE_PX || device.height < SMALL_DEVICE_PX {
        DeviceClass::Mobile
    } else {
        DeviceClass::Tablet
    }
}

// Mobile emulation in synthetic checks runs Android user agents.
fn is_mobile(user_agent: &str) -> bool {
    user_agent.contains("Android")
}

fn orientation(device: &DeviceReport) -> Orientation {
    if device.height > device.width {
        Orientation::Portrait
    } else {
        Orientation::Landscape
    }
}

/// Major browser version parsed out of the user agent, e.g. "120" from
/// "... Chrome/120.0.6099.18 ..." when the configured browser is chrome
fn browser_major_version(user_agent: &str, browser: &str) -> Option<String> {
    let upper_agent = user_agent.to_uppercase();
    let upper_browser = browser.to_uppercase();
    let start = upper_agent.find(&upper_browser)? + upper_browser.len() + 1;
    let rest = user_agent.get(start..)?;
    let end = rest.find('.')?;
    Some(rest[..end].to_string())
}

/// "chrome" -> "Chrome", "FIREFOX" -> "Firefox"
fn display_name(browser: &str) -> String {
    let mut chars = browser.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(user_agent: &str, width: u32, height: u32) -> DeviceReport {
        DeviceReport {
            user_agent: user_agent.to_string(),
            width,
            height,
        }
    }

    #[test]
    fn test_desktop_classification() {
        let report = device("Mozilla/5.0 (X11; Linux x86_64) Chrome/120.0.1.2", 1366, 768);
        assert_eq!(classify(&report), DeviceClass::Desktop);
    }

    #[test]
    fn test_small_android_is_mobile() {
        let report = device("Mozilla/5.0 (Linux; Android 14) Chrome/120.0.1.2", 390, 844);
        assert_eq!(classify(&report), DeviceClass::Mobile);
        assert_eq!(orientation(&report), Orientation::Portrait);
    }

    #[test]
    fn test_large_android_is_tablet() {
        let report = device("Mozilla/5.0 (Linux; Android 14) Chrome/120.0.1.2", 1280, 800);
        assert_eq!(classify(&report), DeviceClass::Tablet);
        assert_eq!(orientation(&report), Orientation::Landscape);
    }

    #[test]
    fn test_browser_major_version_found() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Chrome/120.0.6099.18 Safari/537.36";
        assert_eq!(
            browser_major_version(ua, "chrome"),
            Some("120".to_string())
        );
    }

    #[test]
    fn test_browser_major_version_absent() {
        let ua = "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0";
        assert_eq!(browser_major_version(ua, "chrome"), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("CHROME"), "Chrome");
        assert_eq!(display_name("firefox"), "Firefox");
    }
}
