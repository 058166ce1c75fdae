/*
 * @Date         : 2026-03-02
 * @Description  : GraphInner describe/summary 相关方法
 */

use super::GraphInner;
use crate::nn::descriptor::{GraphDescriptor, NodeDescriptor};

impl GraphInner {
    // ========== 图描述（describe）==========

    /// 导出图的描述符
    ///
    /// 只包含结构信息（拓扑、类型、形状、参数量），不包含参数取值，
    /// 因此同一配置的两次构建会得到相等的描述符。
    pub fn describe(&self) -> GraphDescriptor {
        let mut descriptor = GraphDescriptor::new(&self.name);

        for node_id in self.nodes() {
            let Some(node) = self.nodes.get(&node_id) else {
                continue;
            };
            let parents = node.parents().iter().map(|id| id.0).collect();
            descriptor.add_node(NodeDescriptor::new(
                node_id.0,
                node.name(),
                node.descriptor(),
                node.expected_shape().clone(),
                parents,
            ));
        }

        descriptor
    }

    // ========== 模型摘要（summary）==========

    /// 模型摘要（Unicode 文本表格，类似 Keras 的 `model.summary()`）
    ///
    /// ```text
    /// ┌──────────┬──────────┬────────────────┬────────────┬────────┐
    /// │ 节点名称 │ 类型     │ 输出形状       │     参数量 │ 父节点 │
    /// ├──────────┼──────────┼────────────────┼────────────┼────────┤
    /// │ in_data  │ Input    │ [?, 28, 28, 3] │          - │ -      │
    /// ...
    /// ```
    pub fn summary_string(&self) -> String {
        let desc = self.describe();

        let rows: Vec<[String; 5]> = desc
            .nodes
            .iter()
            .map(|node| {
                [
                    node.name.clone(),
                    node.node_type.type_name().to_string(),
                    node.output_shape.to_string(),
                    node.param_count
                        .map_or_else(|| "-".to_string(), Self::format_number),
                    Self::format_parent_names(&desc, &node.parents),
                ]
            })
            .collect();

        let headers = ["节点名称", "类型", "输出形状", "参数量", "父节点"];
        let mut widths = headers.map(Self::display_width);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(Self::display_width(cell));
            }
        }

        let line = |left: &str, mid: &str, right: &str| {
            let parts: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", parts.join(mid))
        };
        let row_line = |cells: &[String]| {
            let parts: Vec<String> = cells
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (cell, &w))| {
                    let pad = " ".repeat(w - Self::display_width(cell));
                    // 参数量列右对齐
                    if i == 3 {
                        format!(" {pad}{cell} ")
                    } else {
                        format!(" {cell}{pad} ")
                    }
                })
                .collect();
            format!("│{}│\n", parts.join("│"))
        };

        let mut output = String::new();
        output.push_str(&line("┌", "┬", "┐"));
        output.push_str(&row_line(&headers.map(str::to_string)));
        output.push_str(&line("├", "┼", "┤"));
        for row in &rows {
            output.push_str(&row_line(row));
        }
        output.push_str(&line("└", "┴", "┘"));
        output.push_str(&format!(
            "总参数量: {}\n可训练参数: {}\n",
            Self::format_number(self.param_count()),
            Self::format_number(self.trainable_param_count())
        ));
        if !self.penalties.is_empty() {
            let scopes: Vec<&str> = self.penalties.iter().map(|p| p.scope.as_str()).collect();
            output.push_str(&format!("L2 惩罚: {}\n", scopes.join(", ")));
        }

        output
    }

    /// 格式化数字为千分位分隔形式
    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }
        result.chars().rev().collect()
    }

    /// 格式化父节点名称列表
    fn format_parent_names(desc: &GraphDescriptor, parent_ids: &[u64]) -> String {
        if parent_ids.is_empty() {
            "-".to_string()
        } else {
            parent_ids
                .iter()
                .filter_map(|id| desc.nodes.iter().find(|n| n.id == *id))
                .map(|n| n.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// 计算字符串显示宽度（中文字符占 2 列）
    fn display_width(s: &str) -> usize {
        s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
    }
}
