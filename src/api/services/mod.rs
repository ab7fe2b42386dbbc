pub mod assets;
pub mod health;
pub mod relay;
pub mod shortener;

pub use assets::{AssetService, StaticFiles, asset_routes};
pub use health::{AppStartTime, HealthService, health_routes};
pub use relay::{RelayService, RelaySettings, relay_routes};
pub use shortener::{ShortenerService, ShortenerSettings, shortener_routes};
