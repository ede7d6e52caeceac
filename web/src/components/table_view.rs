use dioxus::prelude::*;

/// Plain table with a delete button per row; `on_delete` receives the row index.
#[component]
pub fn TableView(headers: Vec<String>, data: Vec<Vec<String>>, on_delete: EventHandler<usize>) -> Element {
    rsx! {
        div {
            class: "table-container",
            table {
                thead {
                    tr {
                        for header in headers {
                            th { {header} }
                        }
                        th {}
                    }
                }
                tbody {
                    for (row_idx, row) in data.iter().enumerate() {
                        tr {
                            key: "{row_idx}",
                            for cell in row {
                                td { {cell.clone()} }
                            }
                            td {
                                button {
                                    onclick: move |_| on_delete.call(row_idx),
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
