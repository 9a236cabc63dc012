/// 材质定义
///
/// 材质列表的末尾总是附加一个合成的默认材质。面上的材质 ID 缺失或越界时
/// 都回落到这个默认材质。

/// 默认材质的名称
pub const DEFAULT_MATERIAL_NAME: &str = "default";

/// 材质
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// 漫反射颜色 (r, g, b)
    pub diffuse: [f32; 3],
    /// 漫反射贴图文件名
    pub diffuse_texture: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            diffuse,
            diffuse_texture: None,
        }
    }

    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.diffuse_texture = Some(texture.into());
        self
    }

    /// 合成的默认材质：黑色漫反射，没有贴图
    pub fn default_material() -> Self {
        Self::new(DEFAULT_MATERIAL_NAME, [0.0, 0.0, 0.0])
    }

    /// 非空的漫反射贴图名
    pub fn texture_name(&self) -> Option<&str> {
        self.diffuse_texture.as_deref().filter(|name| !name.is_empty())
    }
}

/// 以默认材质结尾的材质列表
#[derive(Debug, Clone, PartialEq)]
pub struct Materials {
    items: Vec<Material>,
}

impl Materials {
    /// 用加载到的材质创建列表，并在末尾附加默认材质
    pub fn new(mut loaded: Vec<Material>) -> Self {
        loaded.push(Material::default_material());
        Self { items: loaded }
    }

    /// 默认材质的 ID（最后一个）
    #[inline]
    pub fn default_id(&self) -> usize {
        self.items.len() - 1
    }

    /// 把面上的材质 ID 解析成有效 ID
    #[inline]
    pub fn resolve(&self, id: Option<usize>) -> usize {
        match id {
            Some(id) if id < self.items.len() => id,
            _ => self.default_id(),
        }
    }

    /// 获取材质，越界时 panic
    #[inline]
    pub fn get(&self, id: usize) -> &Material {
        &self.items[id]
    }

    /// 材质数量（包含默认材质）
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 不包含默认材质的加载数量
    pub fn loaded_count(&self) -> usize {
        self.items.len() - 1
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Material> {
        self.items.iter()
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<'a> IntoIterator for &'a Materials {
    type Item = &'a Material;
    type IntoIter = std::slice::Iter<'a, Material>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
