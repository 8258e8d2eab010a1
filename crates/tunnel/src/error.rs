use hyperspeed_config::ConfigError;
use hyperspeed_render::RenderError;

/// Construction-time failures. Nothing after `init` reports errors.
#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("renderer unavailable: {0}")]
    Render(#[from] RenderError),
}
