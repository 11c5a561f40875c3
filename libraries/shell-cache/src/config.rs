/// Views and assets that are always part of the shell.
pub const STATIC_RESOURCES: &[&str] = &[
    // views
    "/",
    "/conferences",
    "/contact",
    "/about",
    "/impressum",
    "/login",
    // assets
    "/assets/lib/momentjs/moment.js",
    "/assets/lib/bootstrap/js/bootstrap.min.js",
    "/assets/lib/bootstrap/js/bootstrap.js",
    "/assets/stylesheets/g-node-bootstrap.play.css",
    "/assets/lib/jquery/jquery.js",
    "/assets/lib/jquery/jquery.min.js",
    "/assets/lib/jquery-ui/jquery-ui.min.css",
    "/assets/lib/jquery-ui/jquery-ui.js",
    "/assets/stylesheets/layout.css",
    "/assets/javascripts/require.js",
    "/assets/lib/requirejs/require.js",
    "/assets/lib/sammy/sammy.js",
    "/assets/images/favicon.png",
    "/assets/images/bccn.png",
    "/assets/images/gnode_logo.png",
    "/assets/fonts/glyphicons-halflings-regular.eot",
    "/assets/fonts/glyphicons-halflings-regular.svg",
    "/assets/fonts/glyphicons-halflings-regular.ttf",
    "/assets/fonts/glyphicons-halflings-regular.woff",
    "/assets/javascripts/knockout-sortable.min.js",
    // leaflet
    "/assets/javascripts/lib/leaflet/leaflet.css",
    "/assets/javascripts/lib/leaflet/leaflet.js",
    "/assets/javascripts/lib/leaflet/leaflet-src.js",
    "/assets/javascripts/lib/leaflet/images/layers.png",
    "/assets/javascripts/lib/leaflet/images/layers-2x.png",
    "/assets/javascripts/lib/leaflet/images/marker-icon.png",
    "/assets/javascripts/lib/leaflet/images/marker-icon-2x.png",
    "/assets/javascripts/lib/leaflet/images/marker-shadow.png",
    // scheduler
    "/assets/javascripts/lib/scheduler/dhtmlxscheduler.css",
    "/assets/javascripts/lib/scheduler/dhtmlxscheduler.js",
    "/assets/javascripts/lib/scheduler/ext/dhtmlxscheduler_readonly.js",
    // page scripts
    "/assets/javascripts/abstract-list.js",
    "/assets/javascripts/abstract-viewer.js",
    "/assets/javascripts/browser.js",
    "/assets/javascripts/conference-schedule.js",
    "/assets/javascripts/config.js",
    "/assets/javascripts/editor.js",
    "/assets/javascripts/locations.js",
    "/assets/javascripts/main.js",
    "/assets/javascripts/userdash.js",
    // the wasm bundle itself
    "/assets/pkg/gca_frontend_rs.js",
    "/assets/pkg/gca_frontend_rs_bg.wasm",
    // third party
    "https://cdnjs.cloudflare.com/ajax/libs/jquery-ui-timepicker-addon/1.6.1/jquery-ui-timepicker-addon.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/knockout/3.0.0/knockout-debug.js",
    "https://cdnjs.cloudflare.com/ajax/libs/jquery-ui-timepicker-addon/1.6.1/jquery-ui-timepicker-addon.min.css",
    "https://fonts.googleapis.com/css?family=EB+Garamond|Open+Sans",
    "https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.3/MathJax.js?delayStartupUntil=configured",
    "https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.3/extensions/MathMenu.js",
];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    /// Name of the cache bucket. Bumping it replaces the whole shell on the next activation.
    pub version: String,
    pub static_resources: Vec<String>,
    pub conferences_url: String,
    /// Fetched to find out whether the server is reachable at all.
    pub probe_url: String,
    /// Served for uncached requests while offline.
    pub fallback_url: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            version: "v15".to_string(),
            static_resources: STATIC_RESOURCES.iter().map(|url| url.to_string()).collect(),
            conferences_url: "/api/conferences".to_string(),
            probe_url: "/".to_string(),
            fallback_url: "/conferences".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.version, "v15");
        assert_eq!(config.static_resources.len(), STATIC_RESOURCES.len());
        assert!(config.static_resources.contains(&config.fallback_url));
        assert!(config.static_resources.contains(&config.probe_url));
    }

    #[test]
    fn test_version_override() {
        let config: ShellConfig =
            serde_json::from_str(r#"{"version": "v16", "staticResources": ["/"]}"#).unwrap();
        assert_eq!(config.version, "v16");
        assert_eq!(config.static_resources, vec!["/"]);
        assert_eq!(config.fallback_url, "/conferences");
    }
}
