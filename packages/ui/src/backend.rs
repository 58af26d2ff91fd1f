//! The HTTP store and editor configuration shared by every view.

use api::{ApiSettings, HttpStore};
use dioxus::prelude::*;
use store::{HrmsConfig, ReferenceData, ReferenceStore};

use crate::activity_log::{log_activity, use_activity_log, LogLevel};

#[derive(Clone, Debug)]
pub struct Backend {
    pub store: HttpStore,
    pub config: HrmsConfig,
}

pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Lookup lists for select fields; empty until loaded.
pub fn use_reference_data() -> Signal<ReferenceData> {
    use_context::<Signal<ReferenceData>>()
}

/// Build the store from [`ApiSettings`] and provide it with `config` to the
/// tree below. Reference data is fetched once on mount.
#[component]
pub fn BackendProvider(config: HrmsConfig, children: Element) -> Element {
    let store = use_hook(|| {
        let settings = ApiSettings::load().map_err(|e| e.to_string())?;
        tracing::info!(base_url = %settings.base_url, "using HRMS API");
        HttpStore::new(&settings).map_err(|e| e.to_string())
    });
    let mut reference = use_context_provider(|| Signal::new(ReferenceData::default()));
    let mut activity_log = use_activity_log();

    let store = match store {
        Ok(store) => store,
        Err(message) => {
            tracing::error!(%message, "invalid API settings");
            return rsx! {
                div {
                    class: "view-placeholder",
                    h2 { "Cannot reach the HR service" }
                    p { "{message}" }
                }
            };
        }
    };
    use_context_provider(|| Backend {
        store: store.clone(),
        config: config.clone(),
    });

    let _loader = use_resource(move || {
        let store = store.clone();
        async move {
            match store.fetch_reference_data().await {
                Ok(data) => reference.set(data),
                Err(e) => {
                    tracing::warn!(error = %e, "reference data unavailable");
                    log_activity(&mut activity_log, LogLevel::Warning, &format!("Could not load lookup lists: {e}"));
                }
            }
        }
    });

    rsx! { {children} }
}
