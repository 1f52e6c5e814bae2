/// Tables are created on open. Entries reference categories by name and the reference is
/// enforced, so a category must be registered before an entry uses it. The unique index on
/// `categories.name` lets the registry upsert with `INSERT OR IGNORE`.
pub(crate) const SCHEMA: &str = "
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_name ON categories(name);

    CREATE TABLE IF NOT EXISTS income (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount INTEGER NOT NULL,
        category TEXT NOT NULL,
        FOREIGN KEY (category) REFERENCES categories (name)
    );

    CREATE TABLE IF NOT EXISTS expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount INTEGER NOT NULL,
        timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
        category TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        FOREIGN KEY (category) REFERENCES categories (name)
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);

    CREATE TABLE IF NOT EXISTS planned_expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount INTEGER NOT NULL,
        category TEXT NOT NULL,
        FOREIGN KEY (category) REFERENCES categories (name)
    );

    CREATE TABLE IF NOT EXISTS planned_income (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount INTEGER NOT NULL,
        category TEXT NOT NULL,
        FOREIGN KEY (category) REFERENCES categories (name)
    );
";
