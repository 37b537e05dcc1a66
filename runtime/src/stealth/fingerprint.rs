//! Browser fingerprint patching, installed on every new document.

/// Evasions applied before any page script runs.
///
/// Covers the signals common bot checks read: `navigator.webdriver`, the
/// `window.chrome` object, plugin and language lists, the notification
/// permission probe, and outer window size under headless mode.
pub const STEALTH_SCRIPT: &str = r#"
(() => {
    const patch = (target, key, value) => {
        try {
            Object.defineProperty(target, key, { get: () => value, configurable: true });
        } catch (_) {}
    };

    patch(Navigator.prototype, 'webdriver', undefined);
    patch(navigator, 'languages', ['en-US', 'en']);
    patch(navigator, 'hardwareConcurrency', 8);
    patch(navigator, 'plugins', [
        { name: 'PDF Viewer', filename: 'internal-pdf-viewer' },
        { name: 'Chrome PDF Viewer', filename: 'internal-pdf-viewer' },
        { name: 'Chromium PDF Viewer', filename: 'internal-pdf-viewer' },
    ]);

    window.chrome = window.chrome || {};
    window.chrome.runtime = window.chrome.runtime || {
        connect: function () {},
        sendMessage: function () {},
    };
    window.chrome.app = window.chrome.app || { isInstalled: false };

    if (navigator.permissions && navigator.permissions.query) {
        const query = navigator.permissions.query.bind(navigator.permissions);
        navigator.permissions.query = (params) =>
            params && params.name === 'notifications'
                ? Promise.resolve({ state: Notification.permission })
                : query(params);
    }

    if (window.outerWidth === 0 && window.outerHeight === 0) {
        patch(window, 'outerWidth', window.innerWidth);
        patch(window, 'outerHeight', window.innerHeight + 85);
    }
})();
"#;

/// Script installed with `Page.addScriptToEvaluateOnNewDocument`.
pub fn stealth_script() -> &'static str {
    STEALTH_SCRIPT
}
