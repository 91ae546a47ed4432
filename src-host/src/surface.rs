//! Surface stand-in that prints what the core asks of it

use webshell_core::{BrowserSurface, SurfaceCommand};

pub struct ConsoleSurface;

impl ConsoleSurface {
    fn emit(&self, command: SurfaceCommand) {
        tracing::info!(?command, "Surface command");
        println!("{}", serde_json::json!({ "surface": command }));
    }
}

impl BrowserSurface for ConsoleSurface {
    fn load(&self, url: &str) {
        self.emit(SurfaceCommand::Load(url.to_string()));
    }

    fn reload(&self) {
        self.emit(SurfaceCommand::Reload);
    }

    fn go_back(&self) {
        self.emit(SurfaceCommand::GoBack);
    }
}
