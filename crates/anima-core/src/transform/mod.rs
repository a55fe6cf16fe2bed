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

//! Transform decomposition, blending, and the operation pipeline.
//!
//! The heart of this module is the [`decompose`] / [`blend`] / [`compose`]
//! triple: an arbitrary 4x4 transform is split into translation, scale,
//! skew, perspective, and rotation channels, two such decompositions are
//! interpolated channel-by-channel (spherically for the rotation), and the
//! result is recombined into a matrix. On top of that sits a CSS-like
//! pipeline of tagged [`TransformOperation`]s that blends pairwise and
//! falls back to matrix decomposition when two pipelines diverge in shape.

pub mod decompose;
pub mod operation;
pub mod operations;

pub use self::decompose::{blend, compose, decompose, DecomposedTransform};
pub use self::operation::TransformOperation;
pub use self::operations::TransformOperations;
