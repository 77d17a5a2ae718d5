use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CellValue {
    Label(String),
    Amount(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) value: CellValue,
    pub(crate) editable: bool,
    pub(crate) focusable: bool,
}

impl Cell {
    pub(crate) fn label(text: impl Into<String>, editable: bool) -> Self {
        Self {
            value: CellValue::Label(text.into()),
            editable,
            focusable: editable,
        }
    }

    pub(crate) fn amount(value: Decimal, editable: bool) -> Self {
        Self {
            value: CellValue::Amount(value),
            editable,
            focusable: editable,
        }
    }

    /// Label cells count as zero.
    pub(crate) fn amount_or_zero(&self) -> Decimal {
        match self.value {
            CellValue::Amount(v) => v,
            CellValue::Label(_) => Decimal::ZERO,
        }
    }

    pub(crate) fn label_text(&self) -> Option<&str> {
        match &self.value {
            CellValue::Label(s) => Some(s),
            CellValue::Amount(_) => None,
        }
    }
}
