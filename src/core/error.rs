//! 错误处理模块
//!
//! 定义了查看器中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理
//!
//! 网格数据的结构性错误（负索引、越界访问）不在这里建模：
//! 上游加载器已经验证过数据，核心流程中出现这类问题属于断言失败。

use std::fmt;
use std::path::PathBuf;

/// 查看器统一的 Result 类型
pub type Result<T> = std::result::Result<T, ViewerError>;

/// objview 的错误类型
#[derive(Debug)]
pub enum ViewerError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// 网格加载错误
    MeshLoading(MeshLoadError),

    /// 纹理加载错误
    Texture(TextureError),

    /// IO 错误
    Io(std::io::Error),

    /// 初始化错误
    Initialization(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),
}

/// 网格加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),
}

/// 纹理加载相关的错误
///
/// 原始行为是遇到这些错误直接终止进程；这里改为返回给顶层调用者，
/// 由调用者决定是退出还是替换占位纹理。
#[derive(Debug)]
pub enum TextureError {
    /// 按原名和基准目录都找不到纹理文件
    Missing { name: String, base_dir: PathBuf },

    /// 图像解码失败
    Decode { path: PathBuf, reason: String },

    /// 只支持 RGB 和 RGBA 图像
    UnsupportedChannelCount { path: PathBuf, channels: u8 },
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::Config(e) => write!(f, "Configuration error: {}", e),
            ViewerError::Graphics(e) => write!(f, "Graphics error: {}", e),
            ViewerError::MeshLoading(e) => write!(f, "Mesh loading error: {}", e),
            ViewerError::Texture(e) => write!(f, "Texture error: {}", e),
            ViewerError::Io(e) => write!(f, "IO error: {}", e),
            ViewerError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Mesh file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported mesh format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse mesh: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Mesh validation failed: {}", msg),
        }
    }
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Missing { name, base_dir } => write!(
                f,
                "Unable to find texture '{}' (also tried under {})",
                name,
                base_dir.display()
            ),
            TextureError::Decode { path, reason } => {
                write!(f, "Unable to load texture {}: {}", path.display(), reason)
            }
            TextureError::UnsupportedChannelCount { path, channels } => write!(
                f,
                "Texture {} has {} channels, only 3 (RGB) or 4 (RGBA) are supported",
                path.display(),
                channels
            ),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Io(e) => Some(e),
            ViewerError::Config(e) => Some(e),
            ViewerError::Graphics(e) => Some(e),
            ViewerError::MeshLoading(e) => Some(e),
            ViewerError::Texture(e) => Some(e),
            ViewerError::Initialization(_) => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}
impl std::error::Error for MeshLoadError {}
impl std::error::Error for TextureError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Io(err)
    }
}

impl From<ConfigError> for ViewerError {
    fn from(err: ConfigError) -> Self {
        ViewerError::Config(err)
    }
}

impl From<GraphicsError> for ViewerError {
    fn from(err: GraphicsError) -> Self {
        ViewerError::Graphics(err)
    }
}

impl From<MeshLoadError> for ViewerError {
    fn from(err: MeshLoadError) -> Self {
        ViewerError::MeshLoading(err)
    }
}

impl From<TextureError> for ViewerError {
    fn from(err: TextureError) -> Self {
        ViewerError::Texture(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_error_converts_into_viewer_error() {
        let err: ViewerError = TextureError::UnsupportedChannelCount {
            path: PathBuf::from("gray.png"),
            channels: 1,
        }
        .into();

        assert!(matches!(
            err,
            ViewerError::Texture(TextureError::UnsupportedChannelCount { channels: 1, .. })
        ));
        assert!(err.to_string().contains("gray.png"));
    }

    #[test]
    fn test_missing_texture_message_names_both_locations() {
        let err = TextureError::Missing {
            name: "brick.png".to_string(),
            base_dir: PathBuf::from("models"),
        };
        let msg = err.to_string();

        assert!(msg.contains("brick.png"));
        assert!(msg.contains("models"));
    }
}
