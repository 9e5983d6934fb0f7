pub mod core {
    pub mod normalize;
    pub mod value;
}

pub mod metadata {
    pub mod column;
    pub mod description;
    pub mod table;
}

pub mod pagination {
    pub mod cursor;
}

pub mod records {
    pub mod row;
}
