use dioxus::prelude::*;

use store::{EmployeeId, HrmsConfig};
use ui::views::{CreateEmployeeView, EditEmployeeView};
use ui::{ActivityLogProvider, BackendProvider, Navbar};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Root {},
        #[route("/employees/new")]
        CreateEmployee {},
        #[route("/employees/:employee_id")]
        EditEmployee { employee_id: EmployeeId },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const HRMS_TOML: &str = include_str!("../hrms.toml");

fn main() {
    dioxus::logger::init(tracing::Level::INFO).ok();
    dioxus::launch(App);
}

fn load_config() -> HrmsConfig {
    match HrmsConfig::from_toml(HRMS_TOML) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, file = HrmsConfig::filename(), "invalid config, using defaults");
            HrmsConfig::default()
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ActivityLogProvider {
            BackendProvider {
                config,
                Router::<Route> {}
            }
        }
    }
}

#[component]
fn Shell() -> Element {
    rsx! {
        Navbar {
            Link { to: Route::CreateEmployee {}, "New employee" }
        }
        Outlet::<Route> {}
    }
}

/// Redirect `/` to the create form
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::CreateEmployee {});
    rsx! {}
}

#[component]
fn CreateEmployee() -> Element {
    let nav = use_navigator();
    rsx! {
        CreateEmployeeView {
            on_created: move |employee_id| {
                nav.push(Route::EditEmployee { employee_id });
            },
        }
    }
}

#[component]
fn EditEmployee(employee_id: EmployeeId) -> Element {
    rsx! {
        EditEmployeeView { employee_id }
    }
}
