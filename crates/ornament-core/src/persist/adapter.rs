use crate::{
    error::Error,
    instance::Model,
    persist::{
        Row,
        sql::{self, QueryOptions, Statement, sanitize_order},
    },
    traits::ModelKind,
    value::Value,
};
use derive_more::{Deref, DerefMut};
use std::{cell::RefCell, cmp::Ordering, collections::BTreeMap, marker::PhantomData};

///
/// Adapter
///
/// Storage backend for one model kind. Models never talk to storage
/// themselves; an adapter reads their persistable data and hands fetched
/// rows back through `populate` and `from_iterable_collection`.
///

pub trait Adapter<M: ModelKind> {
    /// Models matching every `(field, value)` equality in `filter`.
    fn query(
        &self,
        filter: &[(&str, Value)],
        options: &QueryOptions,
    ) -> Result<Vec<Model<M>>, Error>;

    /// Refresh `model` from storage by primary key and mark it pristine.
    fn load(&self, model: &mut Model<M>) -> Result<(), Error>;

    /// Store a new row and copy the stored identity back onto `model`.
    /// Fails when a row with the same primary key already exists.
    fn create(&mut self, model: &mut Model<M>) -> Result<(), Error>;

    /// Store the persistable data of an existing row, then reload.
    fn update(&mut self, model: &mut Model<M>) -> Result<(), Error>;

    fn delete(&mut self, model: &Model<M>) -> Result<(), Error>;
}

///
/// MemoryTable
/// Rows keyed by the rendered primary key.
///

#[derive(Debug, Default, Deref, DerefMut)]
struct MemoryTable(BTreeMap<Vec<String>, Row>);

impl MemoryTable {
    fn key(values: &Row) -> Vec<String> {
        values.iter().map(|(_, value)| value.to_string()).collect()
    }

    // highest integer key seen plus one; single-column keys only
    fn next_id(&self) -> i64 {
        self.keys()
            .filter_map(|key| key.first()?.parse::<i64>().ok())
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }
}

///
/// MemoryAdapter
///
/// In-process table for one model kind. Every operation also logs the
/// statement a relational adapter would issue for it.
///

#[derive(Debug)]
pub struct MemoryAdapter<M: ModelKind> {
    table: MemoryTable,
    statements: RefCell<Vec<Statement>>,
    kind: PhantomData<fn() -> M>,
}

impl<M: ModelKind> MemoryAdapter<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: MemoryTable::default(),
            statements: RefCell::new(Vec::new()),
            kind: PhantomData,
        }
    }

    /// Statements issued so far, oldest first.
    #[must_use]
    pub fn statements(&self) -> Vec<Statement> {
        self.statements.borrow().clone()
    }

    fn log(&self, statement: Statement) {
        self.statements.borrow_mut().push(statement);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn table_name() -> String {
        crate::model::metadata::<M>().identifier.clone()
    }

    // stored row: persistable data plus the key fields, whatever their flags
    fn row_of(model: &Model<M>) -> Result<Row, Error> {
        let meta = model.metadata();
        let key: Vec<&str> = meta.primary_key.clone();

        model.persistable_data(&key)
    }

    fn fetch(&self, model: &Model<M>) -> Result<&Row, Error> {
        let key = model.primary_key_values()?;
        self.log(sql::select(
            &Self::table_name(),
            &key,
            &QueryOptions::default(),
        ));

        self.table
            .get(&MemoryTable::key(&key))
            .ok_or_else(|| Error::NotFound {
                model: M::PATH,
                key: MemoryTable::key(&key).join(", "),
            })
    }

    fn matches(model: &Model<M>, filter: &[(&str, Value)]) -> Result<bool, Error> {
        let meta = model.metadata();

        for (name, expected) in filter {
            let field = meta
                .field(name)
                .ok_or_else(|| Error::unknown_field(M::PATH, *name))?;

            if model.fields().value_or_null(name) != field.admit(expected.clone()) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn sort(models: &mut [Model<M>], order: &str) -> Result<(), Error> {
        let meta = crate::model::metadata::<M>();
        let mut terms = Vec::new();
        for term in sanitize_order(order).split(',') {
            let mut words = term.split_whitespace();
            let Some(name) = words.next() else {
                continue;
            };

            let field = meta
                .field(name)
                .ok_or_else(|| Error::unknown_field(M::PATH, name))?
                .name;
            let descending = words.next().is_some_and(|w| w.eq_ignore_ascii_case("desc"));

            terms.push((field, descending));
        }

        models.sort_by(|a, b| {
            terms
                .iter()
                .map(|(field, descending)| {
                    let ord = compare(
                        &a.fields().value_or_null(field),
                        &b.fields().value_or_null(field),
                    );
                    if *descending { ord.reverse() } else { ord }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        Ok(())
    }
}

impl<M: ModelKind> Default for MemoryAdapter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ModelKind> Adapter<M> for MemoryAdapter<M> {
    fn query(
        &self,
        filter: &[(&str, Value)],
        options: &QueryOptions,
    ) -> Result<Vec<Model<M>>, Error> {
        self.log(sql::select(&Self::table_name(), filter, options));

        let mut models = Vec::new();
        for model in Model::<M>::from_iterable_collection(self.table.values().cloned())? {
            if Self::matches(&model, filter)? {
                models.push(model);
            }
        }

        if let Some(order) = &options.order {
            Self::sort(&mut models, order)?;
        }

        let offset = options
            .offset
            .map_or(0, |o| usize::try_from(o).unwrap_or(usize::MAX));
        let limit = options
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(models.into_iter().skip(offset).take(limit).collect())
    }

    fn load(&self, model: &mut Model<M>) -> Result<(), Error> {
        let row = self.fetch(model)?.clone();
        model.populate(row)?;
        model.mark_pristine();

        Ok(())
    }

    fn create(&mut self, model: &mut Model<M>) -> Result<(), Error> {
        let table = Self::table_name();
        let mut row = Self::row_of(model)?;
        self.log(sql::insert(&table, &row));

        let meta = model.metadata();
        if let [pk] = meta.primary_key.as_slice()
            && model.fields().value(pk).is_none_or(Value::is_absent)
        {
            let id = Value::Int(self.table.next_id());
            match row.iter_mut().find(|(name, _)| name == pk) {
                Some((_, value)) => *value = id,
                None => row.push((*pk, id)),
            }
        }

        let stored = Model::<M>::from_input(row.clone())?;
        let key = MemoryTable::key(&stored.primary_key_values()?);
        if self.table.contains_key(&key) {
            return Err(Error::DuplicateKey {
                model: M::PATH,
                key: key.join(", "),
            });
        }
        self.table.insert(key, row);

        model.copy_identity_from(&stored);
        self.load(model)
    }

    fn update(&mut self, model: &mut Model<M>) -> Result<(), Error> {
        let table = Self::table_name();
        let key = model.primary_key_values()?;
        self.fetch(model)?;

        let data: Row = model
            .persistable_data(&[])?
            .into_iter()
            .filter(|(name, _)| !key.iter().any(|(k, _)| k == name))
            .collect();
        self.log(sql::update(&table, &data, &key));

        let row = Self::row_of(model)?;
        self.table.insert(MemoryTable::key(&key), row);

        self.load(model)
    }

    fn delete(&mut self, model: &Model<M>) -> Result<(), Error> {
        let table = Self::table_name();
        let key = model.primary_key_values()?;
        self.fetch(model)?;

        self.log(sql::delete(&table, &key));
        self.table.remove(&MemoryTable::key(&key));

        Ok(())
    }
}

// Nulls first, numbers numerically, everything else by rendered text.
fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => a
            .as_float()
            .partial_cmp(&b.as_float())
            .unwrap_or(Ordering::Equal),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
