#[allow(dead_code)]
pub const EMPLOYEES: &str = "\
id:integer,name:string,dept:string,salary:double,joined:date
0,Alice,eng,5200.5,2019-04-01
1,Bob,ops,3100,2021-09-15
2,Carol,eng,6100.75,2018-01-20
3,Dave,sales,2800,2022-02-28
4,Erin,eng,4700,2020-07-07
5,Frank,ops,3900.25,2023-11-11
6,Grace,sales,4100,2017-05-30
7,Heidi,eng,7300,2016-12-01
";

/// Same shape, one unparsable salary on row 2 and a blank line before it.
#[allow(dead_code)]
pub const EMPLOYEES_DIRTY: &str = "\
id:integer,name:string,dept:string,salary:double,joined:date
0,Alice,eng,5200.5,2019-04-01
1,Bob,ops,3100,2021-09-15

2,Carol,eng,n/a,2018-01-20
3,Dave,sales,2800,2022-02-28
";

/// Ages of the canonical four-row example.
#[allow(dead_code)]
pub const AGES: [i64; 4] = [18, 25, 30, 40];
