// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for tree mutation, style copying, and repaint.

use alloc::string::String;
use core::fmt;

use crate::types::NodeId;

/// Structural errors from [`Scene::add_child`](crate::Scene::add_child) and
/// [`Scene::set_children`](crate::Scene::set_children).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// The id refers to a destroyed node.
    StaleNode(NodeId),
    /// Only containers own children.
    NotAContainer(NodeId),
    /// Attaching `child` under `parent` would make `child` its own ancestor.
    Cycle {
        /// The would-be parent.
        parent: NodeId,
        /// The node being attached.
        child: NodeId,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode(id) => write!(f, "node {id:?} has been destroyed"),
            Self::NotAContainer(id) => write!(f, "node {id:?} is a leaf and cannot own children"),
            Self::Cycle { parent, child } => write!(
                f,
                "attaching {child:?} under {parent:?} would create a cycle"
            ),
        }
    }
}

impl core::error::Error for SceneError {}

/// A style value that must not be deep-copied was found in the clonable part of a style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleError {
    /// The value at `key` holds a shared handle.
    NotClonable {
        /// Dotted path of the offending entry, e.g. `markers[2].icon`.
        key: String,
    },
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotClonable { key } => {
                write!(f, "style entry `{key}` holds a shared handle and cannot be copied")
            }
        }
    }
}

impl core::error::Error for StyleError {}

/// A node was left out of a repaint pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// A node's style could not be copied for rendering.
    Style {
        /// The node whose style failed.
        node: NodeId,
        /// The underlying failure.
        source: StyleError,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Style { node, .. } => write!(f, "cannot prepare style of node {node:?}"),
        }
    }
}

impl core::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Style { source, .. } => Some(source),
        }
    }
}
