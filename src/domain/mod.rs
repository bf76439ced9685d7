// Domain layer: 條碼資料模型與對外協作者的介面 (ports)。

pub mod model;
pub mod ports;
