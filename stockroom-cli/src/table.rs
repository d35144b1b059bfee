//! `stockroom table <collection> <action>`

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::{Result, bail};
use clap::{Subcommand, ValueEnum};
use log::debug;
use stockroom_lib::export::{ExportData, export_to_file, to_csv_string};
use stockroom_lib::inventory::*;
use stockroom_lib::model::TableRow;
use stockroom_lib::store::LocalStore;
use stockroom_lib::table::{MoveDirection, PinSide, TableOptions, TableView, render};

/// One operation on a table view. The view is saved after it is applied.
#[derive(Subcommand, Debug, Clone)]
pub enum TableAction {
    /// Print the current page
    Show,
    /// Set the global search text (empty clears it)
    Search { text: String },
    /// Filter one column for this run only
    Filter { column: String, text: String },
    /// Cycle a column's sort: ascending, descending, none
    Sort { column: String },
    /// Hide a column
    Hide { column: String },
    /// Show a hidden column
    ShowColumn { column: String },
    /// Group rows by a column
    Group { column: String },
    /// Stop grouping
    Ungroup,
    /// Move a column one step
    Move { column: String, direction: Direction },
    /// Pin a column to one edge
    Pin { column: String, side: Side },
    /// Unpin a column
    Unpin { column: String },
    /// Print a page (1-based)
    Page { number: usize },
    /// Forget the saved view
    Reset,
    /// Write the filtered, sorted rows of the visible columns as CSV
    Export {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Direction {
    Left,
    Right,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => MoveDirection::Earlier,
            Direction::Right => MoveDirection::Later,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum Side {
    Left,
    Right,
}

impl From<Side> for PinSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => PinSide::Left,
            Side::Right => PinSide::Right,
        }
    }
}

/// Load one collection and run an action on its table.
pub async fn dispatch(
    kind: EntityKind,
    source: &FallbackSource,
    store: Arc<dyn LocalStore>,
    action: TableAction,
    options: TableOptions,
) -> Result<()> {
    match kind {
        EntityKind::ItemTypes => run::<ItemType>(source, store, action, options).await,
        EntityKind::Brands => run::<Brand>(source, store, action, options).await,
        EntityKind::Items => run::<Item>(source, store, action, options).await,
        EntityKind::Inventory => run::<Quantity>(source, store, action, options).await,
        EntityKind::Sales => run::<Sale>(source, store, action, options).await,
        EntityKind::Suppliers => run::<Supplier>(source, store, action, options).await,
        EntityKind::PurchaseOrders => run::<PurchaseOrder>(source, store, action, options).await,
        EntityKind::Warehouses => run::<Warehouse>(source, store, action, options).await,
        EntityKind::Bins => run::<Bin>(source, store, action, options).await,
        EntityKind::Transfers => run::<Transfer>(source, store, action, options).await,
        EntityKind::Returns => run::<Return>(source, store, action, options).await,
        EntityKind::CycleCounts => run::<CycleCount>(source, store, action, options).await,
        EntityKind::Adjustments => run::<Adjustment>(source, store, action, options).await,
    }
}

async fn run<T: Tabular>(
    source: &FallbackSource,
    store: Arc<dyn LocalStore>,
    action: TableAction,
    options: TableOptions,
) -> Result<()> {
    let rows: Vec<T> = source.collection().await;
    let (tx, rx) = mpsc::channel();
    let mut view = TableView::open(T::columns(), rows, store, options)
        .await
        .on_export_csv(move |data| {
            if let Err(e) = tx.send(data.clone()) {
                debug!("export snapshot dropped: {}", e);
            }
        });
    debug!("opened {} view '{}'", T::KIND, view.storage_key());

    let output = apply(&mut view, action).await?;
    view.flush().await;

    match output {
        Output::Table => println!("{}", render(&view)),
        Output::Export(path) => match rx.try_recv() {
            Ok(data) => write_export(&data, path.as_deref())?,
            Err(_) => bail!("nothing to export"),
        },
    }

    view.close().await;
    Ok(())
}

enum Output {
    Table,
    Export(Option<PathBuf>),
}

async fn apply<T: TableRow>(view: &mut TableView<T>, action: TableAction) -> Result<Output> {
    match action {
        TableAction::Show => {}
        TableAction::Search { text } => view.set_global_filter(text),
        TableAction::Filter { column, text } => {
            known(view, &column)?;
            view.set_column_filter(&column, text);
        }
        TableAction::Sort { column } => {
            known(view, &column)?;
            match view.toggle_sort(&column) {
                Some(direction) => eprintln!("sorted by {} {}", column, direction),
                None => eprintln!("sort cleared"),
            }
        }
        TableAction::Hide { column } => {
            known(view, &column)?;
            view.set_column_visibility(&column, false);
        }
        TableAction::ShowColumn { column } => {
            known(view, &column)?;
            view.set_column_visibility(&column, true);
        }
        TableAction::Group { column } => {
            known(view, &column)?;
            view.set_group_by(Some(&column));
        }
        TableAction::Ungroup => view.set_group_by(None),
        TableAction::Move { column, direction } => {
            known(view, &column)?;
            if !view.move_column(&column, direction.into()) {
                eprintln!("'{}' cannot move further", column);
            }
        }
        TableAction::Pin { column, side } => {
            known(view, &column)?;
            if !view.pin_column(&column, Some(side.into())) {
                bail!("'{}' is already pinned; unpin it first", column);
            }
        }
        TableAction::Unpin { column } => {
            known(view, &column)?;
            if !view.pin_column(&column, None) {
                eprintln!("'{}' is not pinned", column);
            }
        }
        TableAction::Page { number } => {
            if number == 0 || number > view.page_count() {
                bail!("page {} out of range 1..={}", number, view.page_count());
            }
            view.set_page_index(number - 1);
        }
        TableAction::Reset => view.reset_view().await,
        TableAction::Export { output } => {
            if !view.export_csv() {
                bail!("export is not available");
            }
            return Ok(Output::Export(output));
        }
    }
    Ok(Output::Table)
}

fn known<T: TableRow>(view: &TableView<T>, column: &str) -> Result<()> {
    if view.column(column).is_none() {
        let ids: Vec<&str> = view.columns().iter().map(|c| c.id.as_str()).collect();
        bail!("unknown column '{}' (expected one of: {})", column, ids.join(", "));
    }
    Ok(())
}

fn write_export(data: &ExportData, path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(path) => {
            export_to_file(data, path)?;
            eprintln!("wrote {} row(s) to {}", data.len(), path.display());
        }
        None => print!("{}", to_csv_string(data)?),
    }
    Ok(())
}
