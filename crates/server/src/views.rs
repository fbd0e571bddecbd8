//! Mapping from engine values to wire contracts.

use api_types::{
    balance::BalanceView,
    category::{CategoryType, CategoryView},
    report::{CategoryTotalView, MonthlySummaryView, Period, Totals},
    transaction::{
        SortOrder, TransactionListItem, TransactionType, TransactionView, TransferCreated,
        TransferDirection, TransferLegView,
    },
    wallet::{WalletSummaryView, WalletView},
};

pub(crate) fn category_type(kind: engine::CategoryKind) -> CategoryType {
    match kind {
        engine::CategoryKind::Expense => CategoryType::Expense,
        engine::CategoryKind::Income => CategoryType::Income,
    }
}

pub(crate) fn category_kind(kind: CategoryType) -> engine::CategoryKind {
    match kind {
        CategoryType::Expense => engine::CategoryKind::Expense,
        CategoryType::Income => engine::CategoryKind::Income,
    }
}

pub(crate) fn engine_type(kind: TransactionType) -> engine::TransactionType {
    match kind {
        TransactionType::Expense => engine::TransactionType::Expense,
        TransactionType::Income => engine::TransactionType::Income,
        TransactionType::Transfer => engine::TransactionType::Transfer,
    }
}

fn transaction_type(kind: engine::TransactionType) -> TransactionType {
    match kind {
        engine::TransactionType::Expense => TransactionType::Expense,
        engine::TransactionType::Income => TransactionType::Income,
        engine::TransactionType::Transfer => TransactionType::Transfer,
    }
}

fn direction(role: engine::LegRole) -> TransferDirection {
    match role {
        engine::LegRole::Outgoing => TransferDirection::Out,
        engine::LegRole::Incoming => TransferDirection::In,
    }
}

pub(crate) fn sort_order(sort: SortOrder) -> engine::SortOrder {
    match sort {
        SortOrder::Newest => engine::SortOrder::Newest,
        SortOrder::Oldest => engine::SortOrder::Oldest,
        SortOrder::Highest => engine::SortOrder::Highest,
        SortOrder::Lowest => engine::SortOrder::Lowest,
    }
}

pub(crate) fn wallet(wallet: engine::Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        currency: wallet.currency.code().to_string(),
        created_at: wallet.created_at,
    }
}

pub(crate) fn category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: category_type(category.kind),
        created_at: category.created_at,
    }
}

pub(crate) fn transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        wallet_id: tx.wallet_id,
        category_id: tx.category_id,
        kind: transaction_type(tx.kind.transaction_type()),
        amount: tx.amount_minor,
        transfer_group_id: tx.transfer_group_id(),
        transfer_direction: tx.leg_role().map(direction),
        note: tx.note,
        occurred_at: tx.occurred_at,
        created_at: tx.created_at,
    }
}

pub(crate) fn list_item(item: engine::TransactionListItem) -> TransactionListItem {
    TransactionListItem {
        transaction: transaction(item.transaction),
        wallet_name: item.wallet_name,
        category_name: item.category_name,
        category_type: item.category_kind.map(category_type),
    }
}

pub(crate) fn transfer_created(created: engine::TransferCreated) -> TransferCreated {
    TransferCreated {
        transfer_group_id: created.transfer_group_id,
        outgoing: transaction(created.outgoing),
        incoming: transaction(created.incoming),
    }
}

pub(crate) fn transfer_legs(legs: engine::TransferLegs) -> Vec<TransferLegView> {
    [legs.outgoing, legs.incoming]
        .into_iter()
        .map(|leg| TransferLegView {
            id: leg.id,
            wallet_id: leg.wallet_id,
            amount: leg.amount_minor,
            note: leg.note,
            occurred_at: leg.occurred_at,
        })
        .collect()
}

pub(crate) fn balance(balance: engine::WalletBalance) -> BalanceView {
    BalanceView {
        wallet_id: balance.wallet_id,
        wallet_name: balance.wallet_name,
        currency: balance.currency.code().to_string(),
        balance: balance.balance,
    }
}

pub(crate) fn wallet_summary(summary: engine::WalletSummary) -> WalletSummaryView {
    WalletSummaryView {
        wallet_id: summary.wallet_id,
        income: summary.income,
        expense: summary.expense,
        net: summary.net,
        uncategorized: summary.uncategorized,
        from: summary.from,
        to: summary.to,
    }
}

pub(crate) fn monthly_summary(summary: engine::MonthlySummary) -> MonthlySummaryView {
    MonthlySummaryView {
        month: summary.month,
        period: Period {
            start: summary.period.start,
            end: summary.period.end,
        },
        summary: Totals {
            total_expense: summary.total_expense,
            total_income: summary.total_income,
            net: summary.net,
        },
        by_category: summary
            .by_category
            .into_iter()
            .map(|total| CategoryTotalView {
                category_id: total.category_id,
                category_name: total.category_name,
                category_type: total.category_kind.map(category_type),
                kind: transaction_type(total.kind.transaction_type()),
                total: total.total,
            })
            .collect(),
    }
}
