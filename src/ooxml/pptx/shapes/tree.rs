/// Shape tree of a slide, layout, master or group (`p:spTree`, `p:grpSp`).
use super::base::{Shape, Tier};
use super::placeholder::{Placeholder, PlaceholderType};
use crate::common::xml::Element;
use log::warn;
use std::collections::HashSet;

/// Ordered collection of the top-level shapes of a container.
#[derive(Debug, Clone, Default)]
pub struct ShapeTree {
    shapes: Vec<Shape>,
}

impl ShapeTree {
    /// Build a tree from shape elements in document order. Elements that are
    /// not shapes are skipped.
    pub(crate) fn from_elements(elements: Vec<Element>, tier: Tier) -> Self {
        let shapes: Vec<Shape> = elements
            .into_iter()
            .filter_map(|e| Shape::from_element(e, tier))
            .collect();

        let mut seen = HashSet::with_capacity(shapes.len());
        for shape in &shapes {
            if !seen.insert(shape.id()) {
                warn!("Duplicate shape id {} in {:?} shape tree", shape.id(), tier);
            }
        }
        Self { shapes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Shape> {
        self.shapes.iter_mut()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// Top-level shape with the given id.
    pub fn shape_by_id(&self, id: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Shape with the given id at any depth.
    pub fn find_by_id(&self, id: u32) -> Option<&Shape> {
        self.iter_recursive().find(|s| s.id() == id)
    }

    /// Mutable shape with the given id at any depth.
    pub fn find_by_id_mut(&mut self, id: u32) -> Option<&mut Shape> {
        for shape in &mut self.shapes {
            if shape.id() == id {
                return Some(shape);
            }
            if let Some(found) = shape.group_shapes_mut().and_then(|g| g.find_by_id_mut(id)) {
                return Some(found);
            }
        }
        None
    }

    /// Give each top-level placeholder the type of the layout placeholder
    /// with the same index.
    pub(crate) fn inherit_placeholder_types(&mut self, layout: &[Placeholder]) {
        for shape in &mut self.shapes {
            let Some(index) = shape.placeholder().map(|ph| ph.index) else {
                continue;
            };
            if let Some(inherited) = layout.iter().find(|ph| ph.index == index) {
                shape.inherit_placeholder_type(inherited.kind);
            }
        }
    }

    /// First placeholder shape with the given index.
    pub fn shape_by_placeholder_index(&self, index: u32) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|s| s.placeholder().is_some_and(|ph| ph.index == index))
    }

    /// First placeholder shape of the given type.
    pub fn shape_by_placeholder_type(&self, kind: PlaceholderType) -> Option<&Shape> {
        self.shapes
            .iter()
            .find(|s| s.placeholder().is_some_and(|ph| ph.kind == kind))
    }

    /// Depth-first iteration over every shape, group children included.
    pub fn iter_recursive(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.shapes.iter()],
        }
    }

    /// Remove the shape with the given id at any depth and return it marked
    /// as removed.
    pub fn remove(&mut self, id: u32) -> Option<Shape> {
        if let Some(pos) = self.shapes.iter().position(|s| s.id() == id) {
            let mut shape = self.shapes.remove(pos);
            shape.mark_removed();
            return Some(shape);
        }
        self.shapes
            .iter_mut()
            .filter_map(Shape::group_shapes_mut)
            .find_map(|group| group.remove(id))
    }

    pub(crate) fn mark_removed(&mut self) {
        for shape in &mut self.shapes {
            shape.mark_removed();
        }
    }

    pub(crate) fn to_elements(&self) -> Vec<Element> {
        self.shapes.iter().map(Shape::to_element).collect()
    }
}

impl<'a> IntoIterator for &'a ShapeTree {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.shapes.iter()
    }
}

/// Iterator returned by [`ShapeTree::iter_recursive`].
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Shape>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Shape;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(shape) => {
                    if let Some(group) = shape.group_shapes() {
                        self.stack.push(group.shapes.iter());
                    }
                    return Some(shape);
                },
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}
