pub mod irrigation_csv;
