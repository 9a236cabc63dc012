//! 配置管理模块
//!
//! 提供查看器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 768
//! height = 768
//! title = "objview"
//!
//! [graphics]
//! vsync = true
//! show_wire = true
//! cull_face = false
//!
//! [camera]
//! eye = [0.0, 0.0, 3.0]
//! lookat = [0.0, 0.0, 0.0]
//! fov = 45.0
//!
//! [mesh]
//! path = "models/cornell_box.obj"
//! normals = "auto"    # auto, always
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, Result};
use crate::geometry::convert::NormalPolicy;

/// 查看器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 相机配置
    #[serde(default)]
    pub camera: CameraConfig,

    /// 网格配置
    #[serde(default)]
    pub mesh: MeshConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,
}

/// 图形配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 垂直同步
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// 启动时是否叠加线框
    #[serde(default = "default_show_wire")]
    pub show_wire: bool,

    /// 启动时是否剔除背面（背面改画线框）
    #[serde(default)]
    pub cull_face: bool,

    /// 背景颜色 (RGBA)
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

/// 相机配置
///
/// 对应 eye / lookat / up 三个向量和透视投影参数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_eye")]
    pub eye: [f32; 3],

    #[serde(default)]
    pub lookat: [f32; 3],

    #[serde(default = "default_up")]
    pub up: [f32; 3],

    /// 垂直视场角（度数）
    #[serde(default = "default_fov")]
    pub fov: f32,

    #[serde(default = "default_near_clip")]
    pub near_clip: f32,

    #[serde(default = "default_far_clip")]
    pub far_clip: f32,
}

/// 网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    /// 模型文件路径（也可以通过命令行第一个位置参数指定）
    #[serde(default)]
    pub path: Option<String>,

    /// 法线重建策略
    #[serde(default)]
    pub normals: NormalPolicy,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default)]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 从字符串解析日志级别（忽略大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// 对应的 EnvFilter 指令
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// 默认值函数
fn default_width() -> u32 { 768 }
fn default_height() -> u32 { 768 }
fn default_title() -> String { "objview".to_string() }
fn default_vsync() -> bool { true }
fn default_show_wire() -> bool { true }
fn default_clear_color() -> [f32; 4] { [0.1, 0.2, 0.3, 1.0] }
fn default_eye() -> [f32; 3] { [0.0, 0.0, 3.0] }
fn default_up() -> [f32; 3] { [0.0, 1.0, 0.0] }
fn default_fov() -> f32 { 45.0 }
fn default_near_clip() -> f32 { 0.01 }
fn default_far_clip() -> f32 { 100.0 }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_log_file() -> String { "objview.log".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            vsync: default_vsync(),
            show_wire: default_show_wire(),
            cull_face: false,
            clear_color: default_clear_color(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: default_eye(),
            lookat: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            near_clip: default_near_clip(),
            far_clip: default_far_clip(),
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            path: None,
            normals: NormalPolicy::Auto,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: false,
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在或解析失败则使用默认配置
    ///
    /// 在日志系统初始化之前调用，所以失败原因只能写到 stderr。
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 第一个参数视为程序名并跳过。支持的参数：
    /// - `<path>`: 第一个不以 `--` 开头的参数作为模型路径
    /// - `--width <value>` / `--height <value>`: 窗口尺寸
    /// - `--no-wire`: 关闭线框叠加
    /// - `--cull`: 开启背面剔除
    /// - `--regen-normals`: 总是按平滑组重建法线
    /// - `--log-level <level>`: 日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--width" => {
                    if let Some(width) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                        self.window.width = width;
                    }
                    i += 1;
                }
                "--height" => {
                    if let Some(height) = args.get(i + 1).and_then(|v| v.parse().ok()) {
                        self.window.height = height;
                    }
                    i += 1;
                }
                "--log-level" => {
                    if let Some(level) = args.get(i + 1).and_then(|v| LogLevel::parse(v)) {
                        self.logging.level = level;
                    }
                    i += 1;
                }
                "--no-wire" => self.graphics.show_wire = false,
                "--cull" => self.graphics.cull_face = true,
                "--regen-normals" => self.mesh.normals = NormalPolicy::Always,
                other if !other.starts_with("--") && self.mesh.path.is_none() => {
                    self.mesh.path = Some(other.to_string());
                }
                _ => {}
            }
            i += 1;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "window.width/height".to_string(),
                reason: "Window dimensions must be greater than 0".to_string(),
            }
            .into());
        }

        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(ConfigError::InvalidValue {
                field: "camera.fov".to_string(),
                reason: "Field of view must be in (0, 180) degrees".to_string(),
            }
            .into());
        }

        if !(self.camera.near_clip > 0.0 && self.camera.near_clip < self.camera.far_clip) {
            return Err(ConfigError::InvalidValue {
                field: "camera.near_clip/far_clip".to_string(),
                reason: "Clip planes must satisfy 0 < near < far".to_string(),
            }
            .into());
        }

        match &self.mesh.path {
            Some(path) if !path.is_empty() => Ok(()),
            _ => Err(ConfigError::InvalidValue {
                field: "mesh.path".to_string(),
                reason: "No model given; pass a path or set mesh.path".to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 768);
        assert_eq!(config.window.height, 768);
        assert!(config.graphics.show_wire);
        assert!(!config.graphics.cull_face);
        assert_eq!(config.mesh.normals, NormalPolicy::Auto);
        assert_eq!(config.camera.eye, [0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [window]
            width = 1024

            [mesh]
            path = "cube.obj"
            normals = "always"
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.mesh.path.as_deref(), Some("cube.obj"));
        assert_eq!(config.mesh.normals, NormalPolicy::Always);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = Config::from_toml_str("[window\nwidth = ");
        assert!(matches!(
            result,
            Err(crate::core::error::ViewerError::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "objview",
            "models/bunny.obj",
            "--width",
            "640",
            "--no-wire",
            "--regen-normals",
            "--log-level",
            "DEBUG",
        ]);

        assert_eq!(config.mesh.path.as_deref(), Some("models/bunny.obj"));
        assert_eq!(config.window.width, 640);
        assert!(!config.graphics.show_wire);
        assert_eq!(config.mesh.normals, NormalPolicy::Always);
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_apply_args_ignores_bad_numbers() {
        let mut config = Config::default();
        config.apply_args(["objview", "--height", "tall", "a.obj"]);

        assert_eq!(config.window.height, 768);
        assert_eq!(config.mesh.path.as_deref(), Some("a.obj"));
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("objview-config-{}.toml", std::process::id()));
        let mut config = Config::default();
        config.window.title = "saved".to_string();
        config.graphics.cull_face = true;
        config.mesh.path = Some("models/teapot.obj".to_string());
        config.mesh.normals = NormalPolicy::Always;
        config.logging.level = LogLevel::Warn;

        config.save_to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(loaded.window.title, "saved");
        assert!(loaded.graphics.cull_face);
        assert_eq!(loaded.mesh.path.as_deref(), Some("models/teapot.obj"));
        assert_eq!(loaded.mesh.normals, NormalPolicy::Always);
        assert_eq!(loaded.logging.level, LogLevel::Warn);
        assert_eq!(loaded.camera.eye, config.camera.eye);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.mesh.path = Some("a.obj".to_string());
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());

        config.window.width = 100;
        config.camera.near_clip = 200.0;
        assert!(config.validate().is_err());
    }
}
