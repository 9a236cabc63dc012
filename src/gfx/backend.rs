//! 图形设备的统一抽象接口
//!
//! 网格转换和纹理缓存只需要"创建顶点缓冲区"和"创建 2D 纹理"两种能力，
//! 这里把它们抽象成 trait，上层逻辑不依赖具体的图形 API，也可以在没有 GPU 的
//! 测试环境里用计数用的假设备替代。

use crate::renderer::texture::DecodedImage;

/// 图形设备的资源创建接口
///
/// # 设计理念
///
/// - **抽象化**：隐藏不同图形 API 的实现细节
/// - **资源所有权**：返回的缓冲区 / 纹理类型拥有 GPU 资源，drop 时释放
pub trait GpuDevice {
    /// 顶点缓冲区句柄
    type Buffer;

    /// 2D 纹理句柄
    type Texture;

    /// 创建并上传一个顶点缓冲区
    ///
    /// # 参数
    ///
    /// * `label` - 调试标签
    /// * `contents` - 交错顶点数据
    fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> Self::Buffer;

    /// 创建并上传一张 2D 纹理（线性过滤）
    ///
    /// `image` 的通道数已经检查过，只会是 3 或 4。
    fn create_texture_2d(&self, label: &str, image: &DecodedImage) -> Self::Texture;

    /// 获取后端的名称，用于日志输出
    fn backend_name(&self) -> &str;
}

/// 测试用的假设备：只记录创建了多少资源
#[cfg(test)]
pub mod testing {
    use super::GpuDevice;
    use crate::renderer::texture::DecodedImage;
    use std::cell::RefCell;

    /// 假缓冲区：记录标签和字节数
    #[derive(Debug, Clone, PartialEq)]
    pub struct FakeBuffer {
        pub label: String,
        pub len: usize,
    }

    /// 假纹理：记录标签和尺寸
    #[derive(Debug, Clone, PartialEq)]
    pub struct FakeTexture {
        pub label: String,
        pub width: u32,
        pub height: u32,
        pub channels: u8,
    }

    #[derive(Debug, Default)]
    pub struct CountingDevice {
        pub buffers: RefCell<Vec<FakeBuffer>>,
        pub textures: RefCell<Vec<FakeTexture>>,
    }

    impl GpuDevice for CountingDevice {
        type Buffer = FakeBuffer;
        type Texture = FakeTexture;

        fn create_vertex_buffer(&self, label: &str, contents: &[u8]) -> FakeBuffer {
            let buffer = FakeBuffer {
                label: label.to_string(),
                len: contents.len(),
            };
            self.buffers.borrow_mut().push(buffer.clone());
            buffer
        }

        fn create_texture_2d(&self, label: &str, image: &DecodedImage) -> FakeTexture {
            let texture = FakeTexture {
                label: label.to_string(),
                width: image.width,
                height: image.height,
                channels: image.channels,
            };
            self.textures.borrow_mut().push(texture.clone());
            texture
        }

        fn backend_name(&self) -> &str {
            "counting"
        }
    }
}
