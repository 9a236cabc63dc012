/// objview 构建脚本
///
/// WGSL 着色器在运行时由 wgpu 编译，这里只负责在着色器变化时触发重新构建。
fn main() {
    println!("cargo:rerun-if-changed=src/renderer/shaders/viewer.wgsl");
}
