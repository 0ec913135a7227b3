//! Initial database migration.
//!
//! Creates all core tables with the invariants the engine relies on pushed
//! into CHECK constraints: stock can never go negative or exceed what
//! entered, and every ledger row is one-sided.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: CUSTOMERS
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 2: ENTRY RECEIPTS & STOCK LINES
        // ============================================================
        db.execute_unprepared(ENTRY_RECEIPTS_SQL).await?;
        db.execute_unprepared(ENTRY_ITEMS_SQL).await?;

        // ============================================================
        // PART 3: CLEARANCE RECEIPTS & CLEARED LINES
        // ============================================================
        db.execute_unprepared(CLEARANCE_RECEIPTS_SQL).await?;
        db.execute_unprepared(CLEARED_ITEMS_SQL).await?;

        // ============================================================
        // PART 4: LEDGER
        // ============================================================
        db.execute_unprepared(LEDGER_ROWS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    phone VARCHAR(50),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const ENTRY_RECEIPTS_SQL: &str = r"
CREATE TABLE entry_receipts (
    id UUID PRIMARY KEY,
    receipt_no BIGINT NOT NULL,
    customer_id UUID NOT NULL REFERENCES customers(id),
    car_no VARCHAR(50),
    entry_date DATE NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_entry_receipts_receipt_no UNIQUE (receipt_no),
    CONSTRAINT chk_entry_receipt_no_positive CHECK (receipt_no > 0)
);

CREATE INDEX idx_entry_receipts_customer ON entry_receipts(customer_id);
";

const ENTRY_ITEMS_SQL: &str = r"
CREATE TABLE entry_items (
    id UUID PRIMARY KEY,
    entry_receipt_id UUID NOT NULL REFERENCES entry_receipts(id),
    product_kind VARCHAR(100) NOT NULL,
    product_variety VARCHAR(100),
    pack_type VARCHAR(50) NOT NULL,
    room VARCHAR(50) NOT NULL,
    unit VARCHAR(50) NOT NULL,
    original_quantity NUMERIC(20, 4) NOT NULL,
    remaining_quantity NUMERIC(20, 4) NOT NULL,
    kj_quantity NUMERIC(20, 4),
    remaining_kj_quantity NUMERIC(20, 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_entry_items_original_positive CHECK (original_quantity > 0),
    CONSTRAINT chk_entry_items_remaining_bounds CHECK (
        remaining_quantity >= 0 AND remaining_quantity <= original_quantity
    ),
    CONSTRAINT chk_entry_items_kj_bounds CHECK (
        (kj_quantity IS NULL AND remaining_kj_quantity IS NULL)
        OR (remaining_kj_quantity >= 0 AND remaining_kj_quantity <= kj_quantity)
    )
);

CREATE INDEX idx_entry_items_receipt ON entry_items(entry_receipt_id);
";

const CLEARANCE_RECEIPTS_SQL: &str = r"
CREATE TABLE clearance_receipts (
    id UUID PRIMARY KEY,
    receipt_no BIGINT NOT NULL,
    customer_id UUID NOT NULL REFERENCES customers(id),
    entry_receipt_id UUID NOT NULL REFERENCES entry_receipts(id),
    car_no VARCHAR(50),
    clearance_date DATE NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_clearance_receipts_receipt_no UNIQUE (receipt_no),
    CONSTRAINT chk_clearance_receipt_no_positive CHECK (receipt_no > 0)
);

CREATE INDEX idx_clearance_receipts_customer ON clearance_receipts(customer_id);
CREATE INDEX idx_clearance_receipts_entry ON clearance_receipts(entry_receipt_id);
";

const CLEARED_ITEMS_SQL: &str = r"
CREATE TABLE cleared_items (
    id UUID PRIMARY KEY,
    clearance_receipt_id UUID NOT NULL REFERENCES clearance_receipts(id),
    entry_item_id UUID NOT NULL REFERENCES entry_items(id),
    quantity_cleared NUMERIC(20, 4) NOT NULL,
    kj_quantity_cleared NUMERIC(20, 4),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_cleared_items_quantity_positive CHECK (quantity_cleared > 0),
    CONSTRAINT chk_cleared_items_kj_positive CHECK (
        kj_quantity_cleared IS NULL OR kj_quantity_cleared > 0
    )
);

CREATE INDEX idx_cleared_items_receipt ON cleared_items(clearance_receipt_id);
CREATE INDEX idx_cleared_items_entry_item ON cleared_items(entry_item_id);
";

const LEDGER_ROWS_SQL: &str = r"
CREATE TABLE ledger_rows (
    id UUID PRIMARY KEY,
    customer_id UUID NOT NULL REFERENCES customers(id),
    kind VARCHAR(50) NOT NULL,
    entry_receipt_id UUID REFERENCES entry_receipts(id),
    clearance_receipt_id UUID REFERENCES clearance_receipts(id),
    description TEXT,
    debit_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    credit_amount NUMERIC(20, 4) NOT NULL DEFAULT 0,
    is_discount BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_ledger_rows_kind CHECK (
        kind IN ('adding_inventory', 'clearance', 'direct_cash')
    ),
    CONSTRAINT chk_ledger_rows_non_negative CHECK (
        debit_amount >= 0 AND credit_amount >= 0
    ),
    CONSTRAINT chk_ledger_rows_one_sided CHECK (
        (debit_amount = 0) <> (credit_amount = 0)
    )
);

CREATE INDEX idx_ledger_rows_customer_order ON ledger_rows(customer_id, created_at, id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_rows CASCADE;
DROP TABLE IF EXISTS cleared_items CASCADE;
DROP TABLE IF EXISTS clearance_receipts CASCADE;
DROP TABLE IF EXISTS entry_items CASCADE;
DROP TABLE IF EXISTS entry_receipts CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
";
