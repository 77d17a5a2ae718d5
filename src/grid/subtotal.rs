use rust_decimal::Decimal;

use super::error::{GridError, GridResult};
use crate::models::Category;

/// Recompute the chain above a change: the parent at `parent` (if any), then
/// its root. The whole chain is rebuilt from the children every time.
///
/// The chain is worked out on a copy of the root and only written back when
/// every sum fits in a `Decimal`; on overflow the root is left as it was.
pub(crate) fn recompute(
    roots: &mut [Category],
    root: usize,
    parent: Option<usize>,
) -> GridResult<()> {
    let Some(slot) = roots.get_mut(root) else {
        return Ok(());
    };
    let mut staged = slot.clone();
    if let Some(parent) = parent.and_then(|p| staged.sub_categories.get_mut(p)) {
        recompute_parent(parent)?;
    }
    recompute_root(&mut staged)?;
    *slot = staged;
    Ok(())
}

pub(crate) fn recompute_all(roots: &mut [Category]) -> GridResult<()> {
    for root in 0..roots.len() {
        let parents = roots.get(root).map_or(0, |r| r.sub_categories.len());
        for parent in 0..parents {
            recompute(roots, root, Some(parent))?;
        }
        recompute(roots, root, None)?;
    }
    Ok(())
}

/// `parent.subtotals[i]` = sum of the real leaves' amounts in month `i`.
fn recompute_parent(parent: &mut Category) -> GridResult<()> {
    for leaf in parent.sub_categories.iter_mut() {
        mirror_leaf(leaf)?;
    }
    let months = parent.months_count();
    let sums = (0..months)
        .map(|i| checked_sum(parent.real_children().map(|leaf| leaf.month_value(i))))
        .collect::<GridResult<Vec<_>>>()?;
    store(parent, sums)
}

/// `root.subtotals[i]` = sum of the real parents' subtotals in month `i`.
fn recompute_root(root: &mut Category) -> GridResult<()> {
    let months = root.months_count();
    let sums = (0..months)
        .map(|i| {
            checked_sum(
                root.real_children()
                    .map(|parent| parent.subtotals.get(i).copied().unwrap_or(Decimal::ZERO)),
            )
        })
        .collect::<GridResult<Vec<_>>>()?;
    store(root, sums)
}

/// Leaves carry their own amounts in `subtotals` so every row has a total.
fn mirror_leaf(leaf: &mut Category) -> GridResult<()> {
    let sums = if leaf.is_placeholder {
        vec![Decimal::ZERO; leaf.months_count()]
    } else {
        (0..leaf.months_count()).map(|i| leaf.month_value(i)).collect()
    };
    store(leaf, sums)
}

fn store(category: &mut Category, mut months: Vec<Decimal>) -> GridResult<()> {
    let aggregate = checked_sum(months.iter().copied())?;
    months.push(aggregate);
    category.subtotals = months;
    Ok(())
}

fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> GridResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(GridError::Overflow)
}
