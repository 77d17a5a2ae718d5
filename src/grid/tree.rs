use std::collections::HashSet;

use rust_decimal::Decimal;

use super::error::{GridError, GridResult};
use super::subtotal;
use crate::models::{Category, CategoryId, CategoryKind, Cell, CellValue, Level};

pub(crate) const PARENT_PROMPT: &str = "Add new Parent Category";

/// Prompt shown on the placeholder closing a parent's leaf list.
pub(crate) fn leaf_prompt(parent_name: &str) -> String {
    format!("Add new {parent_name} category")
}

/// Index path from a root down to a category.
///
/// `parent` and `leaf` are positions in the respective child lists; a root
/// has neither, a parent has no `leaf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CategoryPath {
    pub(crate) root: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) leaf: Option<usize>,
}

impl CategoryPath {
    #[cfg(test)]
    pub(crate) fn level(&self) -> Level {
        match (self.parent, self.leaf) {
            (None, _) => Level::Root,
            (Some(_), None) => Level::Parent,
            (Some(_), Some(_)) => Level::Leaf,
        }
    }

    /// Path of the category owning this one's sibling list.
    pub(crate) fn owner(&self) -> Option<CategoryPath> {
        match (self.parent, self.leaf) {
            (None, _) => None,
            (Some(_), None) => Some(CategoryPath {
                root: self.root,
                parent: None,
                leaf: None,
            }),
            (Some(p), Some(_)) => Some(CategoryPath {
                root: self.root,
                parent: Some(p),
                leaf: None,
            }),
        }
    }
}

/// The income/expense category hierarchy.
///
/// Ownership is strictly top-down: roots own parents, parents own leaves.
/// Lookups go through [`CategoryTree::find_path`] instead of back-pointers.
#[derive(Debug, Clone)]
pub(crate) struct CategoryTree {
    roots: Vec<Category>,
    months_count: usize,
    next_id: u64,
}

impl CategoryTree {
    pub(crate) fn empty(months_count: usize) -> Self {
        Self {
            roots: Vec::new(),
            months_count,
            next_id: 1,
        }
    }

    /// Default hierarchy a new budget starts from.
    pub(crate) fn seeded(months_count: usize) -> Self {
        let mut tree = Self::empty(months_count);

        let income = tree.seed_root(
            "INCOME",
            CategoryKind::Income,
            &[
                ("General Income", &["Sales", "Commission"]),
                ("Other Income", &["Training", "Consulting"]),
            ],
        );
        let expense = tree.seed_root(
            "EXPENSES",
            CategoryKind::Expense,
            &[
                ("Operational expense", &["Management Fee", "Cloud Hosting"]),
                ("Other expense", &["Fulltime salary", "Parttime salary"]),
            ],
        );

        tree.roots = vec![income, expense];
        tree
    }

    fn seed_root(
        &mut self,
        name: &str,
        kind: CategoryKind,
        parents: &[(&str, &[&str])],
    ) -> Category {
        let mut root = self.create_category(name, kind, Level::Root, false);
        for (parent_name, leaves) in parents {
            let mut parent = self.create_category(*parent_name, kind, Level::Parent, false);
            for leaf in *leaves {
                let leaf = self.create_category(*leaf, kind, Level::Leaf, false);
                parent.sub_categories.push(leaf);
            }
            let placeholder = self.placeholder_for(&parent);
            parent.sub_categories.push(placeholder);
            root.sub_categories.push(parent);
        }
        let placeholder = self.placeholder_for(&root);
        root.sub_categories.push(placeholder);
        root
    }

    pub(crate) fn months_count(&self) -> usize {
        self.months_count
    }

    pub(crate) fn roots(&self) -> &[Category] {
        &self.roots
    }

    #[cfg(test)]
    pub(crate) fn roots_mut(&mut self) -> &mut [Category] {
        &mut self.roots
    }

    /// Copy of root `root`, to hand back to [`Self::settle`] if a change has
    /// to be undone.
    pub(crate) fn snapshot(&self, root: usize) -> Option<Category> {
        self.roots.get(root).cloned()
    }

    /// Recompute the subtotals above a change under `root`. If they would
    /// overflow, the root is put back to `before` and the change is dropped.
    pub(crate) fn settle(
        &mut self,
        root: usize,
        parent: Option<usize>,
        before: Category,
    ) -> GridResult<()> {
        let result = subtotal::recompute(&mut self.roots, root, parent);
        if result.is_err() {
            if let Some(slot) = self.roots.get_mut(root) {
                *slot = before;
            }
        }
        result
    }

    #[cfg(test)]
    pub(crate) fn push_root(&mut self, root: Category) {
        self.roots.push(root);
    }

    /// Allocate a fresh category with zeroed values sized to the month range.
    ///
    /// Leaves get a label cell plus one amount cell per month. Placeholders of
    /// any level get an editable label cell; real parents and roots get none.
    pub(crate) fn create_category(
        &mut self,
        name: impl Into<String>,
        kind: CategoryKind,
        level: Level,
        is_placeholder: bool,
    ) -> Category {
        let id = CategoryId(self.next_id);
        self.next_id += 1;
        let name = name.into();

        let cells = match (level, is_placeholder) {
            (Level::Leaf, _) => {
                let mut cells = Vec::with_capacity(self.months_count + 1);
                cells.push(Cell::label(name.clone(), is_placeholder));
                cells.extend(amount_cells(self.months_count, !is_placeholder));
                cells
            }
            (_, true) => vec![Cell::label(name.clone(), true)],
            (_, false) => Vec::new(),
        };

        Category {
            id,
            name,
            kind,
            level,
            is_placeholder,
            cells,
            sub_categories: Vec::new(),
            subtotals: vec![Decimal::ZERO; self.months_count + 1],
        }
    }

    /// Fresh trailing placeholder for `owner`'s child list.
    pub(crate) fn placeholder_for(&mut self, owner: &Category) -> Category {
        match owner.level.child() {
            Some(Level::Parent) => {
                self.create_category(PARENT_PROMPT, owner.kind, Level::Parent, true)
            }
            _ => self.create_category(leaf_prompt(&owner.name), owner.kind, Level::Leaf, true),
        }
    }

    /// Locate a category at any depth.
    pub(crate) fn find_path(&self, id: CategoryId) -> Option<CategoryPath> {
        for (r, root) in self.roots.iter().enumerate() {
            if root.id == id {
                return Some(CategoryPath {
                    root: r,
                    parent: None,
                    leaf: None,
                });
            }
            for (p, parent) in root.sub_categories.iter().enumerate() {
                if parent.id == id {
                    return Some(CategoryPath {
                        root: r,
                        parent: Some(p),
                        leaf: None,
                    });
                }
                if let Some(l) = parent.sub_categories.iter().position(|c| c.id == id) {
                    return Some(CategoryPath {
                        root: r,
                        parent: Some(p),
                        leaf: Some(l),
                    });
                }
            }
        }
        None
    }

    pub(crate) fn get(&self, path: CategoryPath) -> Option<&Category> {
        let root = self.roots.get(path.root)?;
        let Some(p) = path.parent else {
            return Some(root);
        };
        let parent = root.sub_categories.get(p)?;
        match path.leaf {
            Some(l) => parent.sub_categories.get(l),
            None => Some(parent),
        }
    }

    pub(crate) fn get_mut(&mut self, path: CategoryPath) -> Option<&mut Category> {
        let root = self.roots.get_mut(path.root)?;
        let Some(p) = path.parent else {
            return Some(root);
        };
        let parent = root.sub_categories.get_mut(p)?;
        match path.leaf {
            Some(l) => parent.sub_categories.get_mut(l),
            None => Some(parent),
        }
    }

    pub(crate) fn find(&self, id: CategoryId) -> Option<&Category> {
        self.find_path(id).and_then(|path| self.get(path))
    }

    /// Id of the category whose child list holds `id`.
    pub(crate) fn owner_of(&self, id: CategoryId) -> Option<CategoryId> {
        let owner = self.find_path(id)?.owner()?;
        self.get(owner).map(|c| c.id)
    }

    /// Every category in display order (root, its parents, each parent's leaves).
    pub(crate) fn walk(&self) -> Vec<&Category> {
        let mut out = Vec::new();
        for root in &self.roots {
            out.push(root);
            for parent in &root.sub_categories {
                out.push(parent);
                out.extend(parent.sub_categories.iter());
            }
        }
        out
    }

    /// Set the amount of a leaf in month column `month` and recompute the
    /// owning parent and root.
    pub(crate) fn write_cell(
        &mut self,
        id: CategoryId,
        month: usize,
        value: Decimal,
    ) -> GridResult<()> {
        let path = self.find_path(id).ok_or(GridError::NotFound(id))?;
        let months = self.months_count;
        let before = self.snapshot(path.root).ok_or(GridError::NotFound(id))?;
        let leaf = self.get_mut(path).ok_or(GridError::NotFound(id))?;
        check_value_target(leaf, month, months)?;

        if let Some(cell) = leaf.cells.get_mut(month + 1) {
            cell.value = CellValue::Amount(value);
        }
        self.settle(path.root, path.parent, before)?;
        tracing::debug!(category = %id, month, %value, "cell written");
        Ok(())
    }

    /// Replace the typed text in a placeholder's label cell.
    pub(crate) fn edit_label(&mut self, id: CategoryId, text: &str) -> GridResult<()> {
        let path = self.find_path(id).ok_or(GridError::NotFound(id))?;
        let category = self.get_mut(path).ok_or(GridError::NotFound(id))?;
        let cell = category
            .cells
            .first_mut()
            .filter(|c| c.editable)
            .ok_or(GridError::LabelLocked(id))?;
        cell.value = CellValue::Label(text.to_string());
        Ok(())
    }

    /// Re-size every row to a new month count. Structure is kept, amounts are
    /// reset to zero.
    pub(crate) fn resize(&mut self, months_count: usize) {
        self.months_count = months_count;
        for root in &mut self.roots {
            resize_category(root, months_count);
        }
        // Every amount is zero again, so the sums cannot overflow.
        if let Err(e) = subtotal::recompute_all(&mut self.roots) {
            tracing::warn!(error = %e, "subtotals not rebuilt after resize");
        }
        tracing::info!(months = months_count, "category tree resized");
    }

    /// First structural invariant that does not hold, if any.
    pub(crate) fn check_invariants(&self) -> GridResult<()> {
        let mut seen = HashSet::new();
        for root in &self.roots {
            if root.level != Level::Root || root.is_placeholder {
                return Err(invariant(root, "top-level entry is not a root"));
            }
            self.check_shape(root, &mut seen)?;
        }
        Ok(())
    }

    fn check_shape(&self, category: &Category, seen: &mut HashSet<CategoryId>) -> GridResult<()> {
        if !seen.insert(category.id) {
            return Err(invariant(category, "duplicate id"));
        }
        if category.subtotals.len() != self.months_count + 1 {
            return Err(invariant(category, "subtotals not sized to the month range"));
        }

        let expected_cells = match (category.level, category.is_placeholder) {
            (Level::Leaf, _) => self.months_count + 1,
            (_, true) => 1,
            (_, false) => 0,
        };
        if category.cells.len() != expected_cells {
            return Err(invariant(category, "cell count does not match its level"));
        }

        let Some(child_level) = category.level.child() else {
            return Ok(());
        };
        if category.is_placeholder {
            return if category.sub_categories.is_empty() {
                Ok(())
            } else {
                Err(invariant(category, "placeholder owns children"))
            };
        }

        let placeholders = category
            .sub_categories
            .iter()
            .filter(|c| c.is_placeholder)
            .count();
        if placeholders != 1 {
            return Err(invariant(category, "expected exactly one placeholder"));
        }
        if !category.sub_categories.last().is_some_and(|c| c.is_placeholder) {
            return Err(invariant(category, "placeholder is not the last child"));
        }

        for child in &category.sub_categories {
            if child.level != child_level || child.kind != category.kind {
                return Err(invariant(child, "child level or kind mismatch"));
            }
            self.check_shape(child, seen)?;
        }
        Ok(())
    }
}

fn invariant(category: &Category, what: &str) -> GridError {
    GridError::Invariant(format!("{} ({}): {what}", category.name, category.id))
}

/// Shared guard for operations that target a month cell of a real leaf.
pub(crate) fn check_value_target(
    category: &Category,
    month: usize,
    months: usize,
) -> GridResult<()> {
    if category.is_placeholder {
        return Err(GridError::Placeholder(category.id));
    }
    if !category.is_leaf() {
        return Err(GridError::NotALeaf(category.id));
    }
    if month >= months {
        return Err(GridError::MonthOutOfRange { month, months });
    }
    Ok(())
}

fn amount_cells(months: usize, editable: bool) -> impl Iterator<Item = Cell> {
    (0..months).map(move |_| Cell::amount(Decimal::ZERO, editable))
}

fn resize_category(category: &mut Category, months: usize) {
    category.subtotals = vec![Decimal::ZERO; months + 1];
    if category.is_leaf() {
        let label = category
            .cells
            .first()
            .cloned()
            .unwrap_or_else(|| Cell::label(category.name.clone(), category.is_placeholder));
        category.cells = std::iter::once(label)
            .chain(amount_cells(months, !category.is_placeholder))
            .collect();
    }
    for child in &mut category.sub_categories {
        resize_category(child, months);
    }
}
