use bevy::prelude::*;

use monthsary::{GreetingConfig, GreetingPlugin};

fn main() -> AppExit {
    // Photo paths in the config are relative to the "assets" folder under the
    // project root, wherever the executable is launched from
    std::env::set_current_dir(env!("CARGO_MANIFEST_DIR")).ok();

    // Logging comes up with the app, so the config is read after it
    let mut app = monthsary::app();

    let installed = GreetingConfig::load_or_default()
        .and_then(|config| monthsary::install(&mut app, config));
    if let Err(err) = installed {
        error!("Cannot start the greeting: {}", err);
        return AppExit::error();
    }

    app.add_plugins(GreetingPlugin).run()
}
