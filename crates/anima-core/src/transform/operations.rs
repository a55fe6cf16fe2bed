// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An ordered pipeline of transform operations.

use std::mem;

use crate::math::Mat4;
use crate::transform::TransformOperation;

/// An ordered sequence of [`TransformOperation`]s.
///
/// Order matters: the net transform is the product of the operation
/// matrices in list order, so later operations are applied to a point
/// first, CSS-transform style.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransformOperations {
    operations: Vec<TransformOperation>,
}

impl TransformOperations {
    /// Creates an empty pipeline.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation to the end of the pipeline.
    #[inline]
    pub fn push(&mut self, operation: TransformOperation) {
        self.operations.push(operation);
    }

    /// Returns the number of operations in the pipeline.
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the pipeline holds no operations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the operation at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TransformOperation> {
        self.operations.get(index)
    }

    /// Iterates over the operations in pipeline order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TransformOperation> {
        self.operations.iter()
    }

    /// Computes the net transform of the whole pipeline.
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        self.combine_from(0)
    }

    /// Computes the product of the operation matrices from `index` to the
    /// end of the pipeline, seeded with the identity.
    pub fn combine_from(&self, index: usize) -> Mat4 {
        self.operations
            .iter()
            .skip(index)
            .fold(Mat4::IDENTITY, |acc, op| acc * op.to_matrix())
    }

    /// Blends two pipelines at the given progress fraction.
    ///
    /// Operations are blended pairwise for as long as the two pipelines
    /// agree in shape; an `Undefined` operation (or a missing one past the
    /// shorter pipeline's end) matches anything. At the first index where
    /// both sides hold defined, differing kinds, each remaining suffix is
    /// collapsed into a single `Matrix` operation and that pair is blended
    /// through decomposition.
    pub fn blend(to: &Self, from: &Self, progress: f32) -> Self {
        let count = to.len().max(from.len());
        let prefix = Self::matching_prefix_length(to, from);

        let mut out = Self::new();
        for i in 0..prefix {
            let to_op = to.get(i).copied().unwrap_or_default();
            let from_op = from.get(i).copied().unwrap_or_default();
            out.push(TransformOperation::blend(&to_op, &from_op, progress));
        }
        if prefix < count {
            let to_rest = TransformOperation::Matrix(to.combine_from(prefix));
            let from_rest = TransformOperation::Matrix(from.combine_from(prefix));
            out.push(TransformOperation::blend(&to_rest, &from_rest, progress));
        }
        out
    }

    /// Length of the leading run where the two pipelines can blend
    /// operation-by-operation.
    fn matching_prefix_length(to: &Self, from: &Self) -> usize {
        let count = to.len().max(from.len());
        for i in 0..count {
            if let (Some(to_op), Some(from_op)) = (to.get(i), from.get(i)) {
                if !to_op.is_undefined()
                    && !from_op.is_undefined()
                    && mem::discriminant(to_op) != mem::discriminant(from_op)
                {
                    return i;
                }
            }
        }
        count
    }
}

impl From<Vec<TransformOperation>> for TransformOperations {
    /// Builds a pipeline from a list of operations in order.
    fn from(operations: Vec<TransformOperation>) -> Self {
        Self { operations }
    }
}
