use rust_decimal::Decimal;

use super::error::{GridError, GridResult};
use super::tree::{check_value_target, CategoryTree};
use crate::models::{Category, CategoryId, Level};

/// Ids produced by [`add_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Added {
    pub(crate) category: CategoryId,
    /// The fresh placeholder now closing the sibling list.
    pub(crate) placeholder: CategoryId,
}

/// Turn the text typed into `placeholder` into a real category of `owner`.
///
/// The new category goes right before the trailing placeholder, which is
/// replaced by a fresh one showing the default prompt. A new parent gets its
/// own trailing leaf placeholder.
pub(crate) fn add_category(
    tree: &mut CategoryTree,
    placeholder: CategoryId,
    owner: CategoryId,
) -> GridResult<Added> {
    let owner_path = tree.find_path(owner).ok_or(GridError::NotFound(owner))?;
    let owner_cat = tree.get(owner_path).ok_or(GridError::NotFound(owner))?;
    if !owner_cat.is_parent() || owner_cat.is_placeholder {
        return Err(GridError::NotFound(placeholder));
    }
    let slot = owner_cat
        .sub_categories
        .iter()
        .position(|c| c.id == placeholder)
        .ok_or(GridError::NotFound(placeholder))?;
    let consumed = &owner_cat.sub_categories[slot];
    if !consumed.is_placeholder {
        return Err(GridError::NotAPlaceholder(placeholder));
    }

    let name = consumed.display_label().trim().to_string();
    if name.is_empty() || name == consumed.name {
        return Err(GridError::BlankLabel);
    }
    let (kind, level, prompt) = (consumed.kind, consumed.level, consumed.name.clone());

    let before = tree
        .snapshot(owner_path.root)
        .ok_or(GridError::NotFound(owner))?;
    let mut created = tree.create_category(name, kind, level, false);
    if level == Level::Parent {
        let own_placeholder = tree.placeholder_for(&created);
        created.sub_categories.push(own_placeholder);
    }
    let fresh = tree.create_category(prompt, kind, level, true);
    let added = Added {
        category: created.id,
        placeholder: fresh.id,
    };

    let children = &mut tree
        .get_mut(owner_path)
        .ok_or(GridError::NotFound(owner))?
        .sub_categories;
    children.remove(slot);
    children.push(created);
    children.push(fresh);

    tree.settle(owner_path.root, owner_path.parent, before)?;
    tracing::info!(category = %added.category, owner = %owner, "category added");
    debug_assert!(tree.check_invariants().is_ok());
    Ok(added)
}

/// Remove a parent or leaf category. Roots and placeholders stay.
pub(crate) fn delete_category(tree: &mut CategoryTree, id: CategoryId) -> GridResult<Category> {
    let path = tree.find_path(id).ok_or(GridError::NotFound(id))?;
    let category = tree.get(path).ok_or(GridError::NotFound(id))?;
    if category.is_placeholder {
        return Err(GridError::Placeholder(id));
    }
    let owner = path.owner().ok_or(GridError::RootDeletion(id))?;
    let index = path.leaf.or(path.parent).ok_or(GridError::RootDeletion(id))?;

    let before = tree.snapshot(path.root).ok_or(GridError::NotFound(id))?;
    let removed = tree
        .get_mut(owner)
        .ok_or(GridError::NotFound(id))?
        .sub_categories
        .remove(index);
    tree.settle(owner.root, owner.parent, before)?;
    tracing::info!(category = %id, name = %removed.name, "category deleted");

    debug_assert!(tree.check_invariants().is_ok());
    Ok(removed)
}

/// Copy the cell in month column `month` of a leaf to every month column of
/// that leaf, then recompute its parent and root. Returns the copied amount.
pub(crate) fn apply_to_all(
    tree: &mut CategoryTree,
    id: CategoryId,
    month: usize,
) -> GridResult<Decimal> {
    let path = tree.find_path(id).ok_or(GridError::NotFound(id))?;
    let months = tree.months_count();
    let before = tree.snapshot(path.root).ok_or(GridError::NotFound(id))?;
    let leaf = tree.get_mut(path).ok_or(GridError::NotFound(id))?;
    check_value_target(leaf, month, months)?;

    let source = leaf
        .cells
        .get(month + 1)
        .cloned()
        .ok_or(GridError::MonthOutOfRange { month, months })?;
    let value = source.amount_or_zero();
    for cell in leaf.cells.iter_mut().skip(1) {
        *cell = source.clone();
    }
    tree.settle(path.root, path.parent, before)?;
    tracing::info!(category = %id, month, %value, "value applied to all months");
    Ok(value)
}
