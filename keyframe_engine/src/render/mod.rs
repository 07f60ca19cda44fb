//! 渲染接口 - 矩阵栈
//!
//! 渲染端按 平移、旋转、缩放 的顺序把矩阵右乘到当前矩阵上，
//! 列向量约定下得到 `P' = T · R · S · P`。

use glam::DMat4;

use crate::transform::TransformMatrix;

/// 固定管线风格的矩阵栈
pub trait MatrixStack {
    fn push_matrix(&mut self);

    fn pop_matrix(&mut self);

    fn load_identity(&mut self);

    /// 当前矩阵右乘 `m`
    fn mult_matrix(&mut self, m: &TransformMatrix);

    fn current(&self) -> DMat4;
}

/// CPU 端矩阵栈，用于无图形上下文的场合
#[derive(Clone, Debug)]
pub struct SoftwareMatrixStack {
    stack: Vec<DMat4>,
}

impl SoftwareMatrixStack {
    pub fn new() -> Self {
        Self {
            stack: vec![DMat4::IDENTITY],
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn top_mut(&mut self) -> &mut DMat4 {
        if self.stack.is_empty() {
            self.stack.push(DMat4::IDENTITY);
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }
}

impl Default for SoftwareMatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack for SoftwareMatrixStack {
    fn push_matrix(&mut self) {
        let top = self.current();
        self.stack.push(top);
    }

    fn pop_matrix(&mut self) {
        if self.stack.len() <= 1 {
            log::warn!("矩阵栈下溢");
            return;
        }
        self.stack.pop();
    }

    fn load_identity(&mut self) {
        *self.top_mut() = DMat4::IDENTITY;
    }

    fn mult_matrix(&mut self, m: &TransformMatrix) {
        let top = self.top_mut();
        *top = *top * *m.as_dmat4();
    }

    fn current(&self) -> DMat4 {
        self.stack.last().copied().unwrap_or(DMat4::IDENTITY)
    }
}
